use std::{env::args_os, fs, io};

use fcl2svg::fcl::Fcl;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection};
use serde_json::Map;

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let fcl_path = args_os().nth(1).expect("missing argument: path to .fcl");
    let geojson_path = args_os()
        .nth(2)
        .expect("missing argument: path to .geojson output");
    let fcl = Fcl::parse(&fs::read(fcl_path).unwrap()).expect("unsuccessful parse");

    let feature_collection = FeatureCollection::from_iter(fcl.groups().map(|group| Feature {
        id: Some(Id::String(group.id.clone())),
        geometry: Some((&group.polygon()).into()),
        properties: Some(Map::from_iter(vec![(
            "vertices".to_string(),
            group.vertices.len().into(),
        )])),
        ..Default::default()
    }));

    fs::write(geojson_path, feature_collection.to_string()).expect("could not write .geojson");
}
