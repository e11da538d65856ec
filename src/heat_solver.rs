// src/heat_solver.rs - Implicit 1-D transient conduction through a layered column
//
// One backward-Euler step of
//   ρ·Cp·∂T/∂t = ∂/∂z(k·∂T/∂z) + H
// over a stack of heterogeneous nodes. Interface conductivities are harmonic
// means, the top boundary is Dirichlet (fixed surface temperature) and the
// bottom boundary is Neumann (fixed basal heat flux, one-sided gradient). The
// assembled system is tridiagonal and solved directly with the Thomas
// algorithm. Implicit stepping is unconditionally stable, so the caller may
// pick any Δt without a CFL constraint.

// Minimum node spacing (m) the assembly will divide by
const MIN_SPACING_M: f64 = 1.0e-6;

/// Per-layer solver input, derived each step from burial geometry.
#[derive(Debug, Clone, Copy)]
pub struct ThermalNode {
    pub center_depth_m: f64,
    pub conductivity_w_m_k: f64,
    pub bulk_density_kg_m3: f64,
    pub heat_capacity_j_kg_k: f64,
    pub radiogenic_w_m3: f64,
    pub temperature_k: f64,
}

/// Harmonic mean of two conductivities, the physically correct series
/// conductance across a layer interface.
pub fn interface_conductivity(k_a: f64, k_b: f64) -> f64 {
    if k_a > 0.0 && k_b > 0.0 {
        2.0 * k_a * k_b / (k_a + k_b)
    } else {
        0.5 * (k_a + k_b)
    }
}

/// Direct O(n) solve of a tridiagonal system (Thomas algorithm).
/// `sub[0]` and `sup[n-1]` are ignored. Diagonal dominance is the caller's
/// responsibility; the conduction assembly below always satisfies it.
pub fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    debug_assert_eq!(sub.len(), n);
    debug_assert_eq!(sup.len(), n);
    debug_assert_eq!(rhs.len(), n);

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c_prime[i - 1];
        c_prime[i] = sup[i] / denom;
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    x
}

/// Advance the column temperature one implicit step of `dt_s` seconds.
///
/// Returns the new temperature per node, top to bottom. Fewer than 3 nodes is
/// a documented degenerate case: the input temperatures are returned
/// unchanged (the stack is too short to carry an interior equation).
pub fn solve_heat_step(
    nodes: &[ThermalNode],
    dt_s: f64,
    surface_temp_k: f64,
    basal_flux_w_m2: f64,
) -> Vec<f64> {
    let n = nodes.len();
    if n < 3 {
        return nodes.iter().map(|node| node.temperature_k).collect();
    }

    let mut sub = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut sup = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    // Top boundary: Dirichlet
    diag[0] = 1.0;
    rhs[0] = surface_temp_k;

    for i in 1..n - 1 {
        let dz_minus = (nodes[i].center_depth_m - nodes[i - 1].center_depth_m).max(MIN_SPACING_M);
        let dz_plus = (nodes[i + 1].center_depth_m - nodes[i].center_depth_m).max(MIN_SPACING_M);
        let cell_width = 0.5 * (dz_minus + dz_plus);

        let k_up = interface_conductivity(nodes[i - 1].conductivity_w_m_k, nodes[i].conductivity_w_m_k);
        let k_down = interface_conductivity(nodes[i].conductivity_w_m_k, nodes[i + 1].conductivity_w_m_k);

        let rho_cp = nodes[i].bulk_density_kg_m3 * nodes[i].heat_capacity_j_kg_k;
        let alpha = dt_s / (rho_cp * cell_width);

        let a = -alpha * k_up / dz_minus;
        let c = -alpha * k_down / dz_plus;

        sub[i] = a;
        sup[i] = c;
        diag[i] = 1.0 - a - c;
        rhs[i] = nodes[i].temperature_k + dt_s * nodes[i].radiogenic_w_m3 / rho_cp;
    }

    // Bottom boundary: Neumann, T[n-1] - T[n-2] = q·Δz/k
    let dz_bottom = (nodes[n - 1].center_depth_m - nodes[n - 2].center_depth_m).max(MIN_SPACING_M);
    let k_bottom = interface_conductivity(
        nodes[n - 2].conductivity_w_m_k,
        nodes[n - 1].conductivity_w_m_k,
    );
    sub[n - 1] = -1.0;
    diag[n - 1] = 1.0;
    rhs[n - 1] = basal_flux_w_m2 * dz_bottom / k_bottom;

    solve_tridiagonal(&sub, &diag, &sup, &rhs)
}
