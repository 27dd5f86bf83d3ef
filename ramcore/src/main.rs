use ramcore::algorithm::pipeline::{build_map, PipelineConfig};
use ramcore::data::series::RamanSeries;

fn main() {
    // Example: two spectra around the carbon D and G bands
    let series = RamanSeries::new(
        vec![0.0, 0.0, 3600.0, 3600.0],
        vec![1350.0, 1580.0, 1350.0, 1580.0],
        vec![420.0, 610.0, 380.0, 655.0],
    );

    match build_map(&series, &PipelineConfig::d_g_band()) {
        Ok(grid) => println!("{}", grid),
        Err(e) => eprintln!("failed to build map: {}", e),
    }
}
