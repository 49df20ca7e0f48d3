use qerp::workflows::fragment::DMETFragment;
use std::fmt::Write;

/// Human-readable summary of a built fragment, optionally followed by its Pauli terms.
pub fn render_fragment(label: &str, fragment: &DMETFragment, print_terms: bool) -> String {
    let mut out = String::new();
    let (alpha, beta) = fragment.num_particles();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Fragment: {}", label);
    let _ = writeln!(
        out,
        "  Atoms:               {} ({})",
        fragment.geometry().len(),
        formula(fragment)
    );
    let _ = writeln!(out, "  Basis:               {}", fragment.basis());
    let _ = writeln!(
        out,
        "  Reference energy:    {:.10} Ha",
        fragment.reference_energy()
    );
    let _ = writeln!(
        out,
        "  Active space:        {}e in {}o (alpha {}, beta {})",
        fragment.active_electrons(),
        fragment.active_orbitals(),
        alpha,
        beta
    );
    let _ = writeln!(
        out,
        "  Fragment orbitals:   {:?}",
        fragment.fragment_orbitals()
    );
    let _ = writeln!(out, "  Energy shift:        {:.10} Ha", fragment.energy_shift());
    let _ = writeln!(
        out,
        "  Fermionic terms:     {}",
        fragment.fermionic_hamiltonian().num_terms()
    );
    let _ = writeln!(
        out,
        "  Encoding:            {}{}",
        fragment.encoding(),
        if fragment.two_qubit_reduction() {
            " (two-qubit reduction)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        out,
        "  Qubits:              {} ({} Pauli terms)",
        fragment.num_qubits(),
        fragment.qubit_hamiltonian().num_terms()
    );

    if print_terms {
        let _ = writeln!(out, "  Pauli terms:");
        for (string, c) in fragment.qubit_hamiltonian().terms() {
            if c.im == 0.0 {
                let _ = writeln!(out, "    {:+.12}  {}", c.re, string);
            } else {
                let _ = writeln!(out, "    {:+.12}{:+.12}i  {}", c.re, c.im, string);
            }
        }
    }
    out
}

fn formula(fragment: &DMETFragment) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for atom in fragment.geometry().atoms() {
        match counts.iter_mut().find(|(symbol, _)| *symbol == atom.symbol()) {
            Some((_, n)) => *n += 1,
            None => counts.push((atom.symbol(), 1)),
        }
    }
    counts
        .into_iter()
        .map(|(symbol, n)| {
            if n == 1 {
                symbol.to_string()
            } else {
                format!("{}{}", symbol, n)
            }
        })
        .collect()
}
