//! Capital gains handler

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::{error::ApiError, AppState};

/// Query string of `GET /capital-gains`. Bounds arrive as raw strings so a
/// non-integer value can be reported as a 400 with a useful message.
#[derive(Debug, Default, Deserialize)]
pub struct CapitalGainsQuery {
    pub numsharesgt: Option<String>,
    pub numshareslt: Option<String>,
}

/// Total capital gain over the holdings whose share count lies strictly
/// between `numsharesgt` and `numshareslt`, as a plain number with two
/// decimals.
pub async fn capital_gains(
    State(state): State<AppState>,
    Query(query): Query<CapitalGainsQuery>,
) -> Result<String, ApiError> {
    let min = parse_bound("numsharesgt", query.numsharesgt.as_deref())?;
    let max = parse_bound("numshareslt", query.numshareslt.as_deref())?;

    let total = state.engine.total_capital_gain(min, max).await?;
    Ok(format!("{total:.2}"))
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    raw.map(|value| {
        value.trim().parse::<i64>().map_err(|_| {
            ApiError::BadRequest(format!("{name} must be an integer, got '{value}'"))
        })
    })
    .transpose()
}
