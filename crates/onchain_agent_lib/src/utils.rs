use std::error::Error;
use std::fmt::{Display, Formatter};
use web3::types::U256;

pub const ETHER_DECIMALS: usize = 18;
pub const GWEI_DECIMALS: usize = 9;

#[derive(Debug, Clone)]
pub struct ConversionError {
    pub msg: String,
}

impl ConversionError {
    pub fn from(msg: String) -> Self {
        Self { msg }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error during conversion: {}", self.msg)
    }
}

impl Error for ConversionError {}

/// Parses a base-10 amount of the smallest unit.
///
/// Surrounding whitespace is ignored and an empty string reads as zero.
/// Signs, non-digit characters and values above 2^256-1 are rejected.
pub fn parse_wei(wei: &str) -> Result<U256, ConversionError> {
    let wei = wei.trim();
    if wei.is_empty() {
        return Ok(U256::zero());
    }
    if !wei.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::from(format!(
            "Invalid integer amount: {wei}"
        )));
    }
    U256::from_dec_str(wei)
        .map_err(|err| ConversionError::from(format!("Invalid integer amount {wei}: {err:?}")))
}

/// Whole ether in `wei`. The fractional part is discarded, not rounded:
/// `"1999999999999999999"` gives `"1"`. Use [`format_units_exact`] when the
/// fraction matters.
pub fn wei_to_ether(wei: &str) -> Result<String, ConversionError> {
    Ok((parse_wei(wei)? / U256::exp10(ETHER_DECIMALS)).to_string())
}

/// Whole gwei in `wei`, truncated the same way as [`wei_to_ether`].
pub fn wei_to_gwei(wei: &str) -> Result<String, ConversionError> {
    Ok((parse_wei(wei)? / U256::exp10(GWEI_DECIMALS)).to_string())
}

/// Full decimal expansion of `wei` with `decimals` fractional digits,
/// trailing zeros trimmed.
pub fn format_units_exact(wei: &str, decimals: usize) -> Result<String, ConversionError> {
    if decimals > 77 {
        return Err(ConversionError::from(format!(
            "Too many decimals: {decimals}"
        )));
    }
    let amount = parse_wei(wei)?;
    let unit = U256::exp10(decimals);
    let (whole, fraction) = amount.div_mod(unit);
    if fraction.is_zero() {
        return Ok(whole.to_string());
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals);
    Ok(format!("{}.{}", whole, fraction.trim_end_matches('0')))
}

pub fn transaction_fee_wei(gas_price: &str, gas_used: &str) -> Result<String, ConversionError> {
    let gas_price = parse_wei(gas_price)?;
    let gas_used = parse_wei(gas_used)?;
    gas_price
        .checked_mul(gas_used)
        .map(|fee| fee.to_string())
        .ok_or_else(|| {
            ConversionError::from(format!("Fee overflow: {gas_price} * {gas_used}"))
        })
}

/// Short display form of an address, `0x1234...abcd`.
pub fn truncate_address(addr: &str) -> String {
    if addr.len() <= 10 || !addr.is_ascii() {
        return addr.to_string();
    }
    format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
}
