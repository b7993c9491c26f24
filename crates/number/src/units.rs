use {
    alloy::primitives::{
        U256,
        utils::{ParseUnits, Unit, parse_units},
    },
    anyhow::{Context, Result, bail, ensure},
};

pub trait EthUnit: std::marker::Sized {
    /// Returns the current wei amount.
    fn wei(self) -> U256;

    /// Returns the current Mwei amount as wei (i.e. 1e6 wei).
    fn mwei(self) -> U256 {
        self.wei() * Unit::MWEI.wei()
    }

    /// Returns the current Gwei amount as wei (i.e. 1e9 wei).
    fn gwei(self) -> U256 {
        self.wei() * Unit::GWEI.wei()
    }

    /// Returns the current Eth amount as wei (i.e. 1e18 wei).
    fn eth(self) -> U256 {
        self.wei() * Unit::ETHER.wei()
    }
}

impl EthUnit for u64 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

impl EthUnit for u128 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

/// Parses a decimal ether amount such as `"0.05"` into wei.
///
/// Negative amounts and amounts with more than 18 fractional digits are
/// rejected instead of being silently truncated.
pub fn parse_ether(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    ensure!(!amount.is_empty(), "empty ether amount");
    if let Some((_, fraction)) = amount.split_once('.') {
        ensure!(
            fraction.len() <= usize::from(Unit::ETHER.get()),
            "ether amount {amount:?} has more than {} decimals",
            Unit::ETHER.get()
        );
    }

    match parse_units(amount, "ether")
        .with_context(|| format!("invalid ether amount {amount:?}"))?
    {
        ParseUnits::U256(wei) => Ok(wei),
        ParseUnits::I256(_) => bail!("ether amount {amount:?} must not be negative"),
    }
}
