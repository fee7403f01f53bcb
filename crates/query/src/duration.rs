use std::time::Duration;

use brisadb_common::QueryError;

/// Unidades aceitas, em nanossegundos.
const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Faz o parse de um literal de duração como `300ms`, `1.5h` ou `2h45m`.
///
/// Sequência de números (com fração opcional) seguidos de unidade. `0`
/// sozinho é aceito. Durações negativas são rejeitadas.
pub fn parse_duration(literal: &str) -> Result<Duration, QueryError> {
    let invalid = || QueryError::InvalidTtl(literal.to_string());

    let mut rest = literal.strip_prefix('+').unwrap_or(literal);
    if rest.starts_with('-') || rest.is_empty() {
        return Err(invalid());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, frac, after_number) = split_number(rest).ok_or_else(invalid)?;

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let unit = &after_number[..unit_len];
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(invalid)?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(invalid)?;
        if !frac.is_empty() {
            // Fração truncada: limita dígitos para não estourar 10^n.
            let digits = &frac[..frac.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(numerator * scale / denominator)
                .ok_or_else(invalid)?;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        rest = &after_number[unit_len..];
    }

    let total = u64::try_from(total).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(total))
}

/// Separa `123.45rest` em ("123", "45", "rest"). Exige ao menos um dígito.
fn split_number(s: &str) -> Option<(&str, &str, &str)> {
    let whole_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let whole = &s[..whole_end];
    let after_whole = &s[whole_end..];

    let (frac, rest) = match after_whole.strip_prefix('.') {
        Some(after_dot) => {
            let frac_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            (&after_dot[..frac_end], &after_dot[frac_end..])
        }
        None => ("", after_whole),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    Some((whole, frac, rest))
}
