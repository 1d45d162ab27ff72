//! Static instrument registry: the NASDAQ-50 constituents tracked by the dashboard.

use serde::Serialize;

use crate::error::DashboardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
}

const fn inst(symbol: &'static str, name: &'static str, sector: &'static str) -> Instrument {
    Instrument { symbol, name, sector }
}

pub const NASDAQ_50: [Instrument; 50] = [
    inst("AAPL", "Apple Inc.", "Technology"),
    inst("MSFT", "Microsoft Corp.", "Technology"),
    inst("NVDA", "NVIDIA Corp.", "Technology"),
    inst("GOOGL", "Alphabet Inc.", "Communication"),
    inst("AMZN", "Amazon.com Inc.", "Consumer"),
    inst("META", "Meta Platforms Inc.", "Communication"),
    inst("TSLA", "Tesla Inc.", "Consumer"),
    inst("AVGO", "Broadcom Inc.", "Technology"),
    inst("ASML", "ASML Holding N.V.", "Technology"),
    inst("COST", "Costco Wholesale Corp.", "Consumer"),
    inst("PEP", "PepsiCo Inc.", "Consumer"),
    inst("NFLX", "Netflix Inc.", "Communication"),
    inst("AMD", "Advanced Micro Devices", "Technology"),
    inst("ADBE", "Adobe Inc.", "Technology"),
    inst("CSCO", "Cisco Systems Inc.", "Technology"),
    inst("TMUS", "T-Mobile US Inc.", "Communication"),
    inst("INTC", "Intel Corp.", "Technology"),
    inst("CMCSA", "Comcast Corp.", "Communication"),
    inst("INTU", "Intuit Inc.", "Technology"),
    inst("QCOM", "Qualcomm Inc.", "Technology"),
    inst("TXN", "Texas Instruments", "Technology"),
    inst("AMGN", "Amgen Inc.", "Healthcare"),
    inst("HON", "Honeywell International", "Industrials"),
    inst("AMAT", "Applied Materials", "Technology"),
    inst("ISRG", "Intuitive Surgical", "Healthcare"),
    inst("BKNG", "Booking Holdings", "Consumer"),
    inst("SBUX", "Starbucks Corp.", "Consumer"),
    inst("VRTX", "Vertex Pharmaceuticals", "Healthcare"),
    inst("GILD", "Gilead Sciences", "Healthcare"),
    inst("ADP", "Automatic Data Processing", "Industrials"),
    inst("MDLZ", "Mondelez International", "Consumer"),
    inst("REGN", "Regeneron Pharmaceuticals", "Healthcare"),
    inst("ADI", "Analog Devices", "Technology"),
    inst("LRCX", "Lam Research", "Technology"),
    inst("PANW", "Palo Alto Networks", "Technology"),
    inst("MU", "Micron Technology", "Technology"),
    inst("KLAC", "KLA Corp.", "Technology"),
    inst("SNPS", "Synopsys Inc.", "Technology"),
    inst("CDNS", "Cadence Design Systems", "Technology"),
    inst("MELI", "MercadoLibre Inc.", "Consumer"),
    inst("PYPL", "PayPal Holdings", "Financials"),
    inst("CSX", "CSX Corp.", "Industrials"),
    inst("MAR", "Marriott International", "Consumer"),
    inst("ORLY", "O'Reilly Automotive", "Consumer"),
    inst("CRWD", "CrowdStrike Holdings", "Technology"),
    inst("ABNB", "Airbnb Inc.", "Consumer"),
    inst("FTNT", "Fortinet Inc.", "Technology"),
    inst("MRVL", "Marvell Technology", "Technology"),
    inst("PDD", "PDD Holdings", "Consumer"),
    inst("CTAS", "Cintas Corp.", "Industrials"),
];

/// Curated opening prices; every other symbol gets a random start.
pub const BASE_PRICES: [(&str, f64); 10] = [
    ("AAPL", 175.50),
    ("MSFT", 402.10),
    ("NVDA", 850.30),
    ("GOOGL", 168.20),
    ("AMZN", 180.15),
    ("META", 485.90),
    ("TSLA", 170.80),
    ("AVGO", 1300.50),
    ("ASML", 950.20),
    ("COST", 750.10),
];

pub fn base_price(symbol: &str) -> Option<f64> {
    BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, price)| *price)
}

pub fn lookup(symbol: &str) -> Option<&'static Instrument> {
    NASDAQ_50.iter().find(|i| i.symbol == symbol)
}

/// Resolve the instruments for a session, keeping registry order.
///
/// `None` selects the whole registry. Unknown symbols are an error rather than
/// being dropped silently.
pub fn select(symbols: Option<&[String]>) -> Result<Vec<Instrument>, DashboardError> {
    let Some(symbols) = symbols else {
        return Ok(NASDAQ_50.to_vec());
    };

    if let Some(unknown) = symbols.iter().find(|s| lookup(s).is_none()) {
        return Err(DashboardError::UnknownSymbol {
            symbol: unknown.clone(),
        });
    }

    Ok(NASDAQ_50
        .iter()
        .filter(|i| symbols.iter().any(|s| s == i.symbol))
        .copied()
        .collect())
}
