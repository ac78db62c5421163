//! Text and JSON output for factorizations

use crate::factorize::LuFactorization;
use crate::traits::RealField;
use ndarray::{ArrayBase, Data, Ix2};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Format a value like C's `%.{precision}g`
///
/// Uses fixed notation when the decimal exponent X satisfies
/// `-4 <= X < precision`, scientific otherwise; trailing zeros are removed.
pub fn format_g(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to `precision` significant digits
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let mantissa = strip_trailing_zeros(&mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Render a matrix block: a `name =` header, one line per row with every
/// entry as `%9.6g ` and a trailing blank line.
pub fn format_matrix<T, S>(name: &str, matrix: &ArrayBase<S, Ix2>) -> String
where
    T: RealField,
    S: Data<Elem = T>,
{
    let mut out = format!("{name} = \n");
    for row in matrix.rows() {
        for value in row.iter() {
            out.push_str(&format!("{:>9} ", format_g(value.to_f64_lossy(), 6)));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Render A, U, L (with its unit diagonal) and the dense P
pub fn format_factorization<T, S>(
    a: &ArrayBase<S, Ix2>,
    factors: &LuFactorization<T>,
) -> String
where
    T: RealField,
    S: Data<Elem = T>,
{
    let mut out = String::new();
    out.push_str(&format_matrix("A", a));
    out.push_str(&format_matrix("U", &factors.upper()));
    out.push_str(&format_matrix("L", &factors.lower()));
    out.push_str(&format_matrix("P", &factors.permutation_matrix()));
    out
}

fn to_rows<T, S>(matrix: &ArrayBase<S, Ix2>) -> Vec<Vec<f64>>
where
    T: RealField,
    S: Data<Elem = T>,
{
    matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_f64_lossy()).collect())
        .collect()
}

/// Build the JSON document for a factorization
///
/// Matrices are nested row arrays; L includes its unit diagonal and U has
/// its strictly-lower part zeroed. Non-finite entries serialize as `null`.
pub fn factorization_json<T, S>(
    a: &ArrayBase<S, Ix2>,
    factors: &LuFactorization<T>,
) -> serde_json::Value
where
    T: RealField + Serialize,
    S: Data<Elem = T>,
{
    serde_json::json!({
        "dimension": factors.dimension(),
        "a": to_rows(a),
        "u": to_rows(&factors.upper()),
        "l": to_rows(&factors.lower()),
        "permutation": factors.permutation,
        "report": factors.report,
    })
}

/// Write the JSON document to `path`
pub fn export_json<T, S, P>(
    a: &ArrayBase<S, Ix2>,
    factors: &LuFactorization<T>,
    path: P,
) -> std::io::Result<()>
where
    T: RealField + Serialize,
    S: Data<Elem = T>,
    P: AsRef<Path>,
{
    let doc = factorization_json(a, factors);
    let text = serde_json::to_string_pretty(&doc).map_err(std::io::Error::other)?;
    fs::write(path, text)
}
