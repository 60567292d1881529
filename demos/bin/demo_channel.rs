//! Noise channels on a density operator.

use clap::Parser;
use ndarray::{Array2, array};
use num_complex::Complex64;
use qomp::{BackendKind, DensityOperator, OperatorKind, QuantumComputer, QubitId};
use qomp_demos::{init_tracing, print_header, print_result, print_section, print_success};

#[derive(Parser, Debug)]
#[command(name = "demo-channel")]
#[command(about = "Apply amplitude damping and dephasing to |+⟩")]
struct Args {
    /// Number of channel strengths to sweep
    #[arg(long, default_value_t = 5)]
    steps: u32,
}

fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn amplitude_damping(gamma: f64) -> Vec<Array2<Complex64>> {
    vec![
        array![[c(1.0), c(0.0)], [c(0.0), c((1.0 - gamma).sqrt())]],
        array![[c(0.0), c(gamma.sqrt())], [c(0.0), c(0.0)]],
    ]
}

fn dephasing(p: f64) -> Vec<Array2<Complex64>> {
    vec![
        array![[c((1.0 - p).sqrt()), c(0.0)], [c(0.0), c((1.0 - p).sqrt())]],
        array![[c(p.sqrt()), c(0.0)], [c(0.0), c(-p.sqrt())]],
    ]
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let pauli_x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
    let pauli_z = array![[c(1.0), c(0.0)], [c(0.0), c(-1.0)]];

    print_header("Qomp Channel Demo");

    let mut qc = QuantumComputer::new(1, 0, BackendKind::StateVector)?;
    qc.h(QubitId(0))?;
    qc.run(1)?;
    let plus = qc
        .density_operator()
        .ok_or_else(|| anyhow::anyhow!("no state vector to inspect"))?;

    let steps = args.steps.max(2);
    for (name, channel) in [
        ("Amplitude damping", amplitude_damping as fn(f64) -> Vec<Array2<Complex64>>),
        ("Dephasing", dephasing),
    ] {
        print_section(name);
        for k in 0..steps {
            let strength = f64::from(k) / f64::from(steps - 1);
            let mut rho = plus.clone();
            rho.instrument(&channel(strength), &[0], None)?;
            println!(
                "    p={strength:.2}  ⟨X⟩={:+.4}  ⟨Z⟩={:+.4}  purity={:.4}",
                rho.expect(&pauli_x, &[0])?,
                rho.expect(&pauli_z, &[0])?,
                rho.purity_trace()?
            );
        }
    }

    print_section("Selective measurement");
    let projectors = vec![
        array![[c(1.0), c(0.0)], [c(0.0), c(0.0)]],
        array![[c(0.0), c(0.0)], [c(0.0), c(1.0)]],
    ];
    let probabilities = plus.probability(&projectors, &[0], OperatorKind::Kraus)?;
    print_result("Outcome probabilities", format!("{probabilities:?}"));
    let mut post = plus.clone();
    post.instrument(&projectors, &[0], Some(1))?;
    let weight = post.normalize()?;
    print_result("Branch weight", format!("{weight:.4}"));
    print_result("Post-measurement ⟨Z⟩", format!("{:+.4}", post.expect(&pauli_z, &[0])?));

    print_section("Mixture");
    let mixture = DensityOperator::mix(&[plus.clone(), post], &[0.5, 0.5])?;
    print_result("Purity", format!("{:.4}", mixture.purity_trace()?));

    print_success("Channel demo complete");
    Ok(())
}
