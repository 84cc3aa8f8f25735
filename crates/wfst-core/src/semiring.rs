// Weight semirings: probability, log and tropical.

/// Algebraic interpretation of transition weights.
///
/// The engine itself never combines weights; it only needs the identity
/// weight given to transitions added without one, and the name shown in
/// status reports.
///
/// | Semiring      | 1̄ (identity) |
/// |---------------|--------------|
/// | `Probability` | 1            |
/// | `Log`         | 0            |
/// | `Tropical`    | 0            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semiring {
    Probability,
    Log,
    Tropical,
}

impl Semiring {
    /// Multiplicative identity (weight of an unweighted transition).
    pub fn one(self) -> f64 {
        match self {
            Semiring::Probability => 1.0,
            Semiring::Log | Semiring::Tropical => 0.0,
        }
    }

    /// Human-readable name as used in status reports.
    pub fn name(self) -> &'static str {
        match self {
            Semiring::Probability => "probability semiring",
            Semiring::Log => "log semiring",
            Semiring::Tropical => "tropical semiring",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities() {
        assert_eq!(Semiring::Probability.one(), 1.0);
        assert_eq!(Semiring::Log.one(), 0.0);
        assert_eq!(Semiring::Tropical.one(), 0.0);
    }

    #[test]
    fn names() {
        assert_eq!(Semiring::Log.name(), "log semiring");
        assert_eq!(Semiring::Tropical.name(), "tropical semiring");
    }
}
