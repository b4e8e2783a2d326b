//! The elevation join: one pass over the input points, one
//! `gdallocationinfo` call per point.

use crate::{error::RunError, options::Cli, srs};
use gdal::{
    vector::{
        Defn, Feature, FieldDefn, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType,
    },
    Dataset, DriverManager,
};
use geo::geometry::Coord;
use locinfo::Sampler;
use log::debug;
use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::Path,
};

/// Append log written in verbose mode. Never truncated.
const VERBOSE_LOG: &str = "get_height.log";

/// Files making up a shapefile; all of them go before the output is
/// recreated.
const SHAPEFILE_EXTENSIONS: [&str; 4] = ["shp", "shx", "dbf", "prj"];

impl Cli {
    pub fn run(&self) -> Result<(), RunError> {
        let input = Dataset::open(&self.inputfile)
            .map_err(|e| RunError::InputOpen(self.inputfile.clone(), e))?;
        let mut in_layer = input
            .layer(0)
            .map_err(|e| RunError::InputOpen(self.inputfile.clone(), e))?;

        let feature_count = in_layer.feature_count();
        println!("feature count: {feature_count}");
        if feature_count == 0 {
            return Err(RunError::EmptySource(self.inputfile.clone()));
        }

        // (name, type, width) triples, in schema order.
        let in_fields = in_layer
            .defn()
            .fields()
            .map(|field| (field.name(), field.field_type(), field.width()))
            .collect::<Vec<_>>();
        if in_fields.iter().any(|(name, _, _)| name == &self.elev) {
            return Err(RunError::FieldCollision(self.elev.clone()));
        }

        remove_existing(&self.outputfile)?;
        let driver = DriverManager::get_driver_by_name("ESRI Shapefile")
            .map_err(|e| RunError::OutputCreate(self.outputfile.clone(), e))?;
        let mut output = driver
            .create_vector_only(&self.outputfile)
            .map_err(|e| RunError::OutputCreate(self.outputfile.clone(), e))?;
        let out_layer = output
            .create_layer(LayerOptions {
                name: layer_name(&self.outputfile),
                ty: OGRwkbGeometryType::wkbPoint,
                ..Default::default()
            })
            .map_err(|e| RunError::OutputCreate(self.outputfile.clone(), e))?;

        for (name, field_type, width) in &in_fields {
            let field_defn = FieldDefn::new(name, *field_type)?;
            field_defn.set_width(*width);
            field_defn.add_to_layer(&out_layer)?;
        }
        // Heights come back in fractional meters, so the new field is
        // real-valued.
        let elev_defn = FieldDefn::new(&self.elev, OGRFieldType::OFTReal)?;
        elev_defn.add_to_layer(&out_layer)?;

        let sampler = Sampler::new(self.srs.clone(), self.dem.clone());
        let mut verbose_log = self
            .verbose
            .then(|| OpenOptions::new().append(true).create(true).open(VERBOSE_LOG))
            .transpose()?;

        let defn = Defn::from_layer(&out_layer);
        for in_feature in in_layer.features() {
            let fid = in_feature.fid().unwrap_or_default();
            let geometry = in_feature
                .geometry()
                .ok_or(RunError::MissingGeometry(fid))?;
            let (x, y, _) = geometry.get_point(0);

            let mut out_feature = Feature::new(&defn)?;
            out_feature.set_geometry(geometry.clone())?;
            for (name, _, _) in &in_fields {
                if let Some(value) = in_feature.field(name)? {
                    out_feature.set_field(name, &value)?;
                }
            }

            let height = sampler.sample(Coord { x, y })?;
            debug!("({x}, {y}) -> {height}");
            out_feature.set_field_double(&self.elev, height)?;
            out_feature
                .create(&out_layer)
                .map_err(|e| RunError::FeatureWrite(fid, e))?;

            if let Some(log) = verbose_log.as_mut() {
                println!("{x};{y};{height}");
                writeln!(log, "{x};{y};{height}")?;
            }
        }

        srs::write_projection(&self.outputfile, &self.srs)?;
        Ok(())
    }
}

fn layer_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("elevation_points")
}

/// A shapefile is several files; take the whole set out, as the
/// driver's own delete would.
fn remove_existing(path: &Path) -> Result<(), RunError> {
    for ext in SHAPEFILE_EXTENSIONS {
        let piece = path.with_extension(ext);
        match std::fs::remove_file(&piece) {
            Ok(()) => debug!("removed stale {piece:?}"),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => return Err(RunError::Io(e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{layer_name, remove_existing};
    use std::{fs::File, path::Path};

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name(Path::new("out/points.shp")), "points");
        assert_eq!(layer_name(Path::new("elevation_points.shp")), "elevation_points");
    }

    #[test]
    fn test_remove_existing_takes_the_whole_set() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("old.shp");
        for ext in ["shp", "shx", "dbf"] {
            File::create(shp.with_extension(ext)).unwrap();
        }
        remove_existing(&shp).unwrap();
        for ext in ["shp", "shx", "dbf"] {
            assert!(!shp.with_extension(ext).exists());
        }
    }

    #[test]
    fn test_remove_existing_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("never-there.shp")).unwrap();
    }
}
