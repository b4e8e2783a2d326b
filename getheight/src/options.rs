use clap::Parser;
use locinfo::Srs;
use std::path::PathBuf;

/// Sample a DEM at every point of a shapefile and write a copy of the
/// points with the height values in a new attribute field.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input point shapefile.
    #[arg(short, long = "inputfile")]
    pub inputfile: PathBuf,

    /// Digital elevation model to sample heights from.
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Output shapefile. Overwritten if it already exists.
    #[arg(short, long = "outputfile", default_value = "elevation_points.shp")]
    pub outputfile: PathBuf,

    /// Spatial reference of the input coordinates, "AUTHORITY:CODE".
    #[arg(short, long = "s_srs", default_value = "EPSG:3765")]
    pub srs: Srs,

    /// Name of the new height attribute field.
    #[arg(short, long = "elev", default_value = "elevation")]
    pub elev: String,

    /// Echo every sampled point and append it to get_height.log.
    #[arg(short, long)]
    pub verbose: bool,
}
