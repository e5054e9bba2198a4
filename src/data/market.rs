use crate::data::bar::Bar;
use crate::data::indicators::IndicatorTable;
use crate::data::series::{BarSeries, SeriesError};
use crate::instrument::Instrument;
use indexmap::IndexMap;

//bars, indicators and pip conventions for one instrument
#[derive(Debug, Clone)]
pub struct InstrumentData {
    pub instrument: Instrument,
    pub series: BarSeries,
    pub indicators: IndicatorTable,
}

impl InstrumentData {
    //validates the raw bars, rejecting the whole series on any fault
    pub fn new(
        instrument: Instrument,
        bars: Vec<Bar>,
        atr_period: usize,
    ) -> Result<Self, SeriesError> {
        let series = BarSeries::new(bars)?;
        let indicators = IndicatorTable::standard(series.bars(), atr_period);
        Ok(InstrumentData {
            instrument,
            series,
            indicators,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.instrument.symbol
    }
}

//read-only market data shared by every simulation over the same instruments
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    instruments: IndexMap<String, InstrumentData>,
}

impl MarketData {
    pub fn new() -> Self {
        MarketData::default()
    }

    pub fn insert(&mut self, data: InstrumentData) {
        self.instruments.insert(data.symbol().to_string(), data);
    }

    pub fn with(mut self, data: InstrumentData) -> Self {
        self.insert(data);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentData> {
        self.instruments.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
