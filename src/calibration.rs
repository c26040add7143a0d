use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use crate::hist::Hist2D;

/// Source of calibration histograms, addressed by object path and name
pub trait CalibrationStore {
    fn fetch(&self, path: &str, name: &str) -> Result<Hist2D, CalibrationError>;

    /// Like `fetch`, but failures are logged and give `None`
    fn get(&self, path: &str, name: &str) -> Option<Hist2D> {
        match self.fetch(path, name) {
            Ok(hist) => {
                info!("Opened histogram {name} from {path}");
                Some(hist)
            }
            Err(err) => {
                error!("{:#}", anyhow::Error::new(err));
                None
            }
        }
    }
}

/// Calibration objects stored as JSON files below a root directory
///
/// The object `path` is the file `<root>/<path>.json`, holding a map
/// from histogram names to histograms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonCalibrationStore {
    root: PathBuf,
}

impl JsonCalibrationStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_owned(),
        }
    }

    fn file(&self, path: &str) -> PathBuf {
        self.root.join(format!("{path}.json"))
    }
}

impl CalibrationStore for JsonCalibrationStore {
    fn fetch(&self, path: &str, name: &str) -> Result<Hist2D, CalibrationError> {
        let file = self.file(path);
        let content = fs::read_to_string(&file).map_err(|source| {
            CalibrationError::Io {
                path: file.clone(),
                source,
            }
        })?;
        let mut objects: HashMap<String, Hist2D> =
            serde_json::from_str(&content).map_err(|source| {
                CalibrationError::Parse {
                    path: file.clone(),
                    source,
                }
            })?;
        objects
            .remove(name)
            .ok_or_else(|| CalibrationError::MissingObject {
                path: path.to_owned(),
                name: name.to_owned(),
            })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UnfoldingConfig {
    pub apply: bool,
    pub path: String,
    pub name: String,
}

impl Default for UnfoldingConfig {
    fn default() -> Self {
        Self {
            apply: true,
            path: "ResponseMatrix".to_owned(),
            name: "detectorResponseMatrix".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReweightingConfig {
    pub apply: bool,
    pub path: String,
    pub jet_name: String,
    pub ue_name: String,
}

/// Jet or underlying event
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    Jet,
    Ue,
}

/// Antiproton reweighting maps over (pt, η)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AntiprotonWeights {
    pub jet: Option<Hist2D>,
    pub ue: Option<Hist2D>,
}

/// All calibration objects used by the analysis
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Calibration {
    pub response: Option<Hist2D>,
    pub antiproton_weights: AntiprotonWeights,
}

impl Calibration {
    pub fn load(
        store: &impl CalibrationStore,
        unfolding: &UnfoldingConfig,
        reweighting: &ReweightingConfig,
    ) -> Self {
        let response = if unfolding.apply {
            store.get(&unfolding.path, &unfolding.name)
        } else {
            None
        };
        let antiproton_weights = if reweighting.apply {
            let load = |name: &str| {
                store.get(&reweighting.path, &format!("{name}_antiproton"))
            };
            AntiprotonWeights {
                jet: load(&reweighting.jet_name),
                ue: load(&reweighting.ue_name),
            }
        } else {
            AntiprotonWeights::default()
        };
        Self {
            response,
            antiproton_weights,
        }
    }

    /// Antiproton weight, 1 without map or outside its range
    pub fn antiproton_weight(&self, region: Region, pt: f64, eta: f64) -> f64 {
        let map = match region {
            Region::Jet => &self.antiproton_weights.jet,
            Region::Ue => &self.antiproton_weights.ue,
        };
        map.as_ref()
            .and_then(|map| map.content_at(pt, eta))
            .unwrap_or(1.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::hist::Binning;

    struct MemoryStore(HashMap<(String, String), Hist2D>);

    impl CalibrationStore for MemoryStore {
        fn fetch(&self, path: &str, name: &str) -> Result<Hist2D, CalibrationError> {
            self.0
                .get(&(path.to_owned(), name.to_owned()))
                .cloned()
                .ok_or_else(|| CalibrationError::MissingObject {
                    path: path.to_owned(),
                    name: name.to_owned(),
                })
        }
    }

    fn weights(value: f64) -> Hist2D {
        let pt = Binning::uniform(2, 0., 10.).unwrap();
        let eta = Binning::uniform(1, -1., 1.).unwrap();
        Hist2D::with_counts(pt, eta, vec![vec![value], vec![value]]).unwrap()
    }

    #[test]
    fn missing_objects_are_none() {
        let store = MemoryStore(HashMap::new());
        let reweighting = ReweightingConfig {
            apply: true,
            ..Default::default()
        };
        let calib = Calibration::load(&store, &UnfoldingConfig::default(), &reweighting);
        assert_eq!(calib, Calibration::default());
        assert_eq!(calib.antiproton_weight(Region::Jet, 1., 0.), 1.);
    }

    #[test]
    fn reweighting_maps() {
        let mut objects = HashMap::new();
        objects.insert(("w".to_owned(), "jet_antiproton".to_owned()), weights(1.5));
        objects.insert(("w".to_owned(), "ue_antiproton".to_owned()), weights(0.5));
        let store = MemoryStore(objects);
        let reweighting = ReweightingConfig {
            apply: true,
            path: "w".to_owned(),
            jet_name: "jet".to_owned(),
            ue_name: "ue".to_owned(),
        };
        let unfolding = UnfoldingConfig {
            apply: false,
            ..Default::default()
        };
        let calib = Calibration::load(&store, &unfolding, &reweighting);
        assert_eq!(calib.response, None);
        assert_eq!(calib.antiproton_weight(Region::Jet, 1., 0.), 1.5);
        assert_eq!(calib.antiproton_weight(Region::Ue, 1., 0.), 0.5);
        assert_eq!(calib.antiproton_weight(Region::Ue, 11., 0.), 1.);
    }

    #[test]
    fn maps_load_independently() {
        let mut objects = HashMap::new();
        objects.insert(("w".to_owned(), "jet_antiproton".to_owned()), weights(1.5));
        let store = MemoryStore(objects);
        let reweighting = ReweightingConfig {
            apply: true,
            path: "w".to_owned(),
            jet_name: "jet".to_owned(),
            ue_name: "ue".to_owned(),
        };
        let unfolding = UnfoldingConfig {
            apply: false,
            ..Default::default()
        };
        let calib = Calibration::load(&store, &unfolding, &reweighting);
        assert!(calib.antiproton_weights.jet.is_some());
        assert!(calib.antiproton_weights.ue.is_none());
        assert_eq!(calib.antiproton_weight(Region::Jet, 1., 0.), 1.5);
        assert_eq!(calib.antiproton_weight(Region::Ue, 1., 0.), 1.);
    }

    #[test]
    fn dotted_object_paths() {
        let store = JsonCalibrationStore::new("/calib");
        assert_eq!(store.file("Users/x/v1.2"), PathBuf::from("/calib/Users/x/v1.2.json"));
        assert_eq!(store.file("ResponseMatrix"), PathBuf::from("/calib/ResponseMatrix.json"));
    }

    #[test]
    fn json_store() {
        let dir = std::env::temp_dir().join(format!("jetcone-calib-{}", std::process::id()));
        fs::create_dir_all(dir.join("Users")).unwrap();
        fs::write(
            dir.join("Users").join("response.json"),
            r#"{ "detectorResponseMatrix": {
                "x_edges": [0, 50, 100],
                "y_edges": [-10, 0, 10],
                "counts": [[1, 1], [0, 2]]
            } }"#,
        )
        .unwrap();
        let store = JsonCalibrationStore::new(&dir);
        let hist = store.get("Users/response", "detectorResponseMatrix").unwrap();
        assert_eq!(hist.content_at(75., 5.), Some(2.));
        assert!(store.get("Users/response", "other").is_none());
        assert!(matches!(
            store.fetch("Users/missing", "detectorResponseMatrix"),
            Err(CalibrationError::Io { .. })
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
