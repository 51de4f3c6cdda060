use crate::Base;

/// A flanking-base code: `S1[k]` for some neighboring position `k`, or `-1`
/// if that neighbor does not exist or lies on the other strand (cut-point
/// aware flanking).
pub type Flank = i16;

/// The Boltzmann-weight energy oracle. Implementations are pure functions of
/// sequence context; every returned weight must be strictly positive. The
/// core consumes this trait -- it never defines the underlying loop-energy
/// model itself.
///
/// `pair_type` codes follow the `ptype` convention (`PairTypeRNA::code`):
/// AU=1, CG=2, GC=3, UG=4, GU=5, UA=6, and the neutral-closure sentinel 7
/// for "not a valid pair" (never 0).
pub trait PartitionFunctionModel {
    /// Thermal energy in kcal/mol at the configured temperature.
    fn kt(&self) -> f64;

    /// Per-base scaling factor, used to keep floating point magnitudes
    /// bounded in the partition function recursion.
    fn pf_scale(&self) -> f64;

    /// Boltzmann weight of closing a multiloop.
    fn exp_ml_closing(&self) -> f64;

    /// Boltzmann weight of duplex (intermolecular) initiation.
    fn exp_duplex_init(&self) -> f64;

    /// Forced to 0 for cofolding, kept as a method so a single model
    /// instance can still be reused for single-strand folding elsewhere.
    fn min_loop_size(&self) -> usize {
        0
    }

    /// Boltzmann weight of a hairpin loop with `u` unpaired bases closed by
    /// `pair_type`, with 5'/3' flanking codes `s5`/`s3`.
    fn exp_hairpin(&self, u: usize, pair_type: u8, s5: Flank, s3: Flank, seq: &[Base], i: usize) -> f64;

    /// Boltzmann weight of an interior loop with `u1`/`u2` unpaired bases on
    /// either side, closed by `type_outer` and enclosing `type_inner`.
    #[allow(clippy::too_many_arguments)]
    fn exp_int_loop(
        &self,
        u1: usize,
        u2: usize,
        type_outer: u8,
        type_inner: u8,
        si: Flank,
        sj: Flank,
        sk: Flank,
        sl: Flank,
    ) -> f64;

    /// Boltzmann weight of a stem contribution inside a multiloop.
    fn exp_ml_stem(&self, pair_type: u8, s5: Flank, s3: Flank) -> f64;

    /// Boltzmann weight of a stem contribution at the exterior loop.
    fn exp_ext_loop(&self, pair_type: u8, s5: Flank, s3: Flank) -> f64;
}

/// Every Boltzmann weight is 1, `kT = 1`, `pf_scale = 1`. Under this model
/// `q[i,j]` counts valid dot-bracket structures on `[i..j]` combinatorially.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformModel;

impl PartitionFunctionModel for UniformModel {
    fn kt(&self) -> f64 {
        1.0
    }

    fn pf_scale(&self) -> f64 {
        1.0
    }

    fn exp_ml_closing(&self) -> f64 {
        1.0
    }

    fn exp_duplex_init(&self) -> f64 {
        1.0
    }

    fn exp_hairpin(&self, _u: usize, _pair_type: u8, _s5: Flank, _s3: Flank, _seq: &[Base], _i: usize) -> f64 {
        1.0
    }

    fn exp_int_loop(&self, _u1: usize, _u2: usize, _to: u8, _ti: u8, _si: Flank, _sj: Flank, _sk: Flank, _sl: Flank) -> f64 {
        1.0
    }

    fn exp_ml_stem(&self, _pair_type: u8, _s5: Flank, _s3: Flank) -> f64 {
        1.0
    }

    fn exp_ext_loop(&self, _pair_type: u8, _s5: Flank, _s3: Flank) -> f64 {
        1.0
    }
}

/// A small, illustrative nearest-neighbor model, temperature-scaled the way
/// Turner-style parameter sets are (`dG(T)` folded into a per-pair-type
/// enthalpy blend). This is *not* a faithful port of the Turner 2004
/// parameter set -- the loop-energy model is an external collaborator --
/// it exists so the engine has a temperature- and pair-type-sensitive
/// oracle to run integration tests and demos against.
#[derive(Debug, Clone)]
pub struct SimpleModel {
    temperature_c: f64,
    pf_scale: f64,
}

impl SimpleModel {
    pub fn new(temperature_c: f64, pf_scale: f64) -> Self {
        SimpleModel { temperature_c, pf_scale }
    }

    fn kelvin(&self) -> f64 {
        self.temperature_c + 273.15
    }

    /// Crude per-pair-type stacking strength in kcal/mol at 37C, ordered the
    /// way real nearest-neighbor stacks are (G-C strongest, G-U/U-G
    /// weakest).
    fn stack_en37(pair_type: u8) -> f64 {
        match pair_type {
            2 | 3 => -3.3, // CG / GC
            1 | 6 => -2.1, // AU / UA
            4 | 5 => -1.4, // UG / GU
            _ => 0.0,
        }
    }

    fn boltzmann(&self, delta_g_kcal: f64) -> f64 {
        (-delta_g_kcal / self.kt()).exp()
    }
}

impl PartitionFunctionModel for SimpleModel {
    fn kt(&self) -> f64 {
        // kcal/mol, R = 0.0019872041 kcal/(mol K)
        0.0019872041 * self.kelvin()
    }

    fn pf_scale(&self) -> f64 {
        self.pf_scale
    }

    fn exp_ml_closing(&self) -> f64 {
        self.boltzmann(3.4)
    }

    fn exp_duplex_init(&self) -> f64 {
        self.boltzmann(4.1)
    }

    fn exp_hairpin(&self, u: usize, pair_type: u8, _s5: Flank, _s3: Flank, _seq: &[Base], _i: usize) -> f64 {
        let initiation = 4.0 + 1.75 * self.kt() * (u.max(1) as f64).ln();
        let closure = Self::stack_en37(pair_type) * 0.3;
        self.boltzmann(initiation + closure)
    }

    fn exp_int_loop(&self, u1: usize, u2: usize, type_outer: u8, type_inner: u8, _si: Flank, _sj: Flank, _sk: Flank, _sl: Flank) -> f64 {
        let u = u1 + u2;
        if u == 0 {
            let dg = Self::stack_en37(type_outer) + Self::stack_en37(type_inner);
            return self.boltzmann(dg);
        }
        let asymmetry = (u1 as f64 - u2 as f64).abs() * 0.5;
        let dg = 1.0 + 1.75 * self.kt() * (u as f64).ln() + asymmetry;
        self.boltzmann(dg)
    }

    fn exp_ml_stem(&self, pair_type: u8, _s5: Flank, _s3: Flank) -> f64 {
        self.boltzmann(Self::stack_en37(pair_type) * 0.5 + 0.4)
    }

    fn exp_ext_loop(&self, pair_type: u8, _s5: Flank, _s3: Flank) -> f64 {
        self.boltzmann(Self::stack_en37(pair_type) * 0.5)
    }
}
