use thiserror::Error;

/// Which required field of a holding record was missing or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingField {
    Symbol,
    Shares,
    PurchasePrice,
}

impl HoldingField {
    /// The key under which the holdings store publishes this field.
    pub fn key(&self) -> &'static str {
        match self {
            HoldingField::Symbol => "symbol",
            HoldingField::Shares => "shares",
            HoldingField::PurchasePrice => "purchase price",
        }
    }
}

impl std::fmt::Display for HoldingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.key())
    }
}

/// Coarse, machine-checkable classification of a failure.
///
/// The HTTP boundary maps these onto 400 / 404 / 500 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Bad input data (a malformed holding record).
    ClientError,
    /// The requested holding does not exist.
    NotFound,
    /// Upstream or unexpected failure.
    ServerError,
}

impl StatusClass {
    pub fn code(&self) -> u16 {
        match self {
            StatusClass::ClientError => 400,
            StatusClass::NotFound => 404,
            StatusClass::ServerError => 500,
        }
    }
}

/// Unified error type for the capital-gains core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Holdings store ──────────────────────────────────────────────
    #[error("Holdings service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid data format from holdings service: {0}")]
    UpstreamDataInvalid(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    // ── Per-holding computation ─────────────────────────────────────
    #[error("Missing or invalid key in holding data: {field} (holding {holding})")]
    MalformedHolding { holding: String, field: HoldingField },

    #[error("Price unavailable for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    #[error("Error processing stock {holding}: {source}")]
    CalculationError {
        holding: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Arithmetic overflow: {0}")]
    Arithmetic(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Classify this error for the caller. Only malformed holdings are the
    /// caller's problem; a missing holding is a 404; everything else is
    /// treated as a server-side failure.
    pub fn status_class(&self) -> StatusClass {
        match self {
            CoreError::MalformedHolding { .. } => StatusClass::ClientError,
            CoreError::HoldingNotFound(_) => StatusClass::NotFound,
            _ => StatusClass::ServerError,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::UpstreamDataInvalid(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs so API keys never reach logs or
        // error bodies.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
