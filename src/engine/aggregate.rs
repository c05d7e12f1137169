use rust_decimal::Decimal;

/// A fold over amounts: an identity element and a combining function.
#[derive(Clone, Copy)]
pub struct Aggregate {
    pub identity: Decimal,
    pub combine: fn(Decimal, Decimal) -> Decimal,
}

fn add(a: Decimal, b: Decimal) -> Decimal {
    a + b
}

fn max(a: Decimal, b: Decimal) -> Decimal {
    a.max(b)
}

pub const SUM: Aggregate = Aggregate {
    identity: Decimal::ZERO,
    combine: add,
};

/// Zero is the identity, so an empty input (or all-negative amounts) folds to
/// zero.
pub const MAX: Aggregate = Aggregate {
    identity: Decimal::ZERO,
    combine: max,
};

impl Aggregate {
    pub fn apply<I: IntoIterator<Item = Decimal>>(&self, amounts: I) -> Decimal {
        amounts.into_iter().fold(self.identity, self.combine)
    }
}
