pub mod plot;
pub mod subject;

pub use plot::{format_summary, parse_deals, plot_deals, read_deals_file, write_geojson, LoadedDeals, PlotReport};
pub use subject::{SubjectClient, SubjectError};
