//! Teleportation with classically controlled corrections.

use clap::Parser;
use ndarray::array;
use num_complex::Complex64;
use qomp::{BackendKind, QuantumComputer};
use qomp_demos::circuits::teleport;
use qomp_demos::{
    SimArgs, init_tracing, print_header, print_result, print_section, print_success,
    print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Teleport Ry(angle·π)|0⟩ and check the received state")]
struct Args {
    #[command(flatten)]
    sim: SimArgs,

    /// Preparation angle in multiples of π
    #[arg(long, default_value_t = 0.3)]
    angle: f64,

    /// Number of independent teleportations
    #[arg(long, default_value_t = 5)]
    rounds: u32,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = args.sim.to_config()?;
    if config.backend_kind()? != BackendKind::StateVector {
        print_warning("teleporting a rotated state needs the state_vector backend");
        config.backend = BackendKind::StateVector.name().to_string();
    }

    print_header("Qomp Teleportation Demo");
    print_result("Angle", format!("{}π", args.angle));

    let z = array![
        [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        [Complex64::new(0.0, 0.0), Complex64::new(-1.0, 0.0)]
    ];
    let expected = (args.angle * std::f64::consts::PI).cos();
    print_result("Expected ⟨Z⟩", format!("{expected:.6}"));

    for round in 0..args.rounds {
        print_section(&format!("Round {}", round + 1));
        let mut seeded = config.clone();
        seeded.seed = config.seed.map(|s| s.wrapping_add(u64::from(round)));
        let mut qc = QuantumComputer::from_config(3, 2, &seeded)?;
        teleport(&mut qc, args.angle)?;
        qc.run(1)?;

        let received = qc
            .density_operator()
            .ok_or_else(|| anyhow::anyhow!("no state vector to inspect"))?
            .partial_trace(&[0, 1])?;
        print_result("Classical bits", qc.memory().to_bitstring());
        print_result("Received ⟨Z⟩", format!("{:.6}", received.expect(&z, &[0])?));
        print_result("Purity", format!("{:.6}", received.purity_trace()?));
    }

    print_success("Teleportation demo complete");
    Ok(())
}
