use serde::{Deserialize, Serialize};

//represents a tradable instrument and its pip conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    //instrument symbol (eg EURUSD, XAUUSD)
    pub symbol: String,

    //price increment of one pip
    pub pip_size: f64,

    //account-currency value of one pip move for one unit of size
    pub pip_value: f64,

    //typical bid/ask spread in price units
    pub spread: f64,
}

impl Instrument {
    //creates a new instrument
    pub fn new(symbol: String, pip_size: f64, pip_value: f64, spread: f64) -> Self {
        Instrument {
            symbol,
            pip_size,
            pip_value,
            spread,
        }
    }

    //converts a price difference to pips
    pub fn price_to_pips(&self, price_diff: f64) -> f64 {
        price_diff / self.pip_size
    }

    //calculates pnl in account currency from a price move
    //price_diff - exit minus entry, already signed for direction
    //size - position size in units
    pub fn pnl_from_price_move(&self, price_diff: f64, size: f64) -> f64 {
        price_diff * self.value_per_price_unit() * size
    }

    //account-currency value of a 1.0 price move for one unit
    pub fn value_per_price_unit(&self) -> f64 {
        self.pip_value / self.pip_size
    }

    //price offset paid on entry: half the spread plus configured slippage
    pub fn entry_offset(&self, slippage: f64) -> f64 {
        self.spread / 2.0 + slippage
    }

    //euro / us dollar (pip = 0.0001)
    pub fn eurusd() -> Self {
        Instrument::new("EURUSD".to_string(), 0.0001, 0.0001, 0.00010)
    }

    //pound / us dollar
    pub fn gbpusd() -> Self {
        Instrument::new("GBPUSD".to_string(), 0.0001, 0.0001, 0.00014)
    }

    //us dollar / yen (pip = 0.01)
    pub fn usdjpy() -> Self {
        Instrument::new("USDJPY".to_string(), 0.01, 0.01, 0.012)
    }

    //spot gold (pip = 0.1)
    pub fn xauusd() -> Self {
        Instrument::new("XAUUSD".to_string(), 0.1, 0.1, 0.30)
    }

    //known presets by symbol
    pub fn preset(symbol: &str) -> Option<Self> {
        match symbol.to_uppercase().as_str() {
            "EURUSD" => Some(Instrument::eurusd()),
            "GBPUSD" => Some(Instrument::gbpusd()),
            "USDJPY" => Some(Instrument::usdjpy()),
            "XAUUSD" | "GOLD" => Some(Instrument::xauusd()),
            _ => None,
        }
    }

    //helper to create a custom instrument from cli parameters
    //pip_value defaults to pip_size so pnl is in price units times size
    pub fn from_params(
        symbol: String,
        pip_size: f64,
        pip_value: Option<f64>,
        spread: Option<f64>,
    ) -> Self {
        let pip_value = pip_value.unwrap_or(pip_size);
        let spread = spread.unwrap_or(0.0);

        Instrument::new(symbol, pip_size, pip_value, spread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pip_value_gives_price_unit_pnl() {
        let x = Instrument::from_params("X".to_string(), 0.01, None, None);
        assert_eq!(x.pnl_from_price_move(-2.0, 100.0), -200.0);
        assert!((x.price_to_pips(-2.0) + 200.0).abs() < 1e-9);
    }

    #[test]
    fn gold_pips_are_ten_cents() {
        let gold = Instrument::xauusd();
        assert!((gold.price_to_pips(1.5) - 15.0).abs() < 1e-9);
        assert_eq!(Instrument::preset("gold"), Some(gold));
    }

    #[test]
    fn entry_offset_is_half_spread_plus_slippage() {
        let eur = Instrument::eurusd();
        assert!((eur.entry_offset(0.0001) - 0.00015).abs() < 1e-12);
    }
}
