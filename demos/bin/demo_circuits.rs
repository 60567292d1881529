//! Bell and GHZ states measured in several bases.

use clap::Parser;
use qomp::{QuantumComputer, QubitId, qubits};
use qomp_demos::circuits::{bell, ghz};
use qomp_demos::{
    SimArgs, init_tracing, print_counts, print_header, print_result, print_section, print_success,
};

#[derive(Parser, Debug)]
#[command(name = "demo-circuits")]
#[command(about = "Prepare Bell and GHZ states and sample them")]
struct Args {
    #[command(flatten)]
    sim: SimArgs,

    /// GHZ register width
    #[arg(long, default_value_t = 4)]
    width: u32,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.sim.to_config()?;
    let shots = config.default_shots.max(100);

    print_header("Qomp Circuit Demo");
    print_result("Backend", &config.backend);
    print_result("Shots", shots);

    print_section("Bell pair, Z basis");
    let mut qc = QuantumComputer::from_config(2, 0, &config)?;
    bell(&mut qc, QubitId(0), QubitId(1))?;
    qc.measure(&qubits(&[0, 1]))?;
    let result = qc.run(shots)?;
    print_counts(&result);

    print_section("Bell pair, X basis");
    let mut qc = QuantumComputer::from_config(2, 0, &config)?;
    bell(&mut qc, QubitId(0), QubitId(1))?;
    qc.mx(&qubits(&[0, 1]))?;
    print_counts(&qc.run(shots)?);

    print_section("Bell pair, Bell basis");
    let mut qc = QuantumComputer::from_config(2, 0, &config)?;
    bell(&mut qc, QubitId(0), QubitId(1))?;
    qc.mb(QubitId(0), QubitId(1))?;
    let result = qc.run(shots)?;
    print_counts(&result);
    print_result("Most frequent", format!("{:?}", result.most_frequent()));

    print_section(&format!("GHZ on {} qubits", args.width));
    let mut qc = QuantumComputer::from_config(args.width, 0, &config)?;
    ghz(&mut qc, args.width)?;
    let all: Vec<u32> = (0..args.width).collect();
    qc.measure(&qubits(&all))?;
    let result = qc.run(shots)?;
    print_counts(&result);
    print_result("Circuit ops", qc.circuit().len());
    println!("{}", result.to_json()?);

    print_success("Circuit demo complete");
    Ok(())
}
