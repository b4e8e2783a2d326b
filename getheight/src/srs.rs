//! Output projection sidecar.

use crate::error::RunError;
use gdal::spatial_ref::SpatialRef;
use locinfo::Srs;
use std::path::{Path, PathBuf};

/// Writes the WKT form of `srs` to `<output stem>.prj` and returns
/// the path written.
///
/// Shapefiles don't embed their spatial reference; readers pick it up
/// from this sidecar. Its content depends on the SRS argument alone.
pub fn write_projection(output: &Path, srs: &Srs) -> Result<PathBuf, RunError> {
    let path = output.with_extension("prj");
    let wkt = SpatialRef::from_epsg(srs.code())?.to_wkt()?;
    std::fs::write(&path, wkt).map_err(|e| RunError::ProjectionWrite(path.clone(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::write_projection;

    #[test]
    fn test_write_projection() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("points.shp");
        let prj = write_projection(&out, &"EPSG:4326".parse().unwrap()).unwrap();
        assert_eq!(prj, dir.path().join("points.prj"));
        let wkt = std::fs::read_to_string(prj).unwrap();
        assert!(wkt.starts_with("GEOGCS"));
        assert!(wkt.contains("\"EPSG\",\"4326\""));
    }
}
