//! Imports a KML/KMZ file and writes an interactive map of its contents.
//!
//! Usage: `cargo run --example kml_to_map -- pastures.kml [out.html]`

use rangeland::io::{read_kml, read_kmz};
use rangeland::WebMap;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let input = args.next().expect("usage: kml_to_map <file.kml|file.kmz> [out.html]");
    let output = args.next().unwrap_or_else(|| "map.html".to_string());

    let frame = if input.to_ascii_lowercase().ends_with(".kmz") {
        read_kmz(&input)
    } else {
        read_kml(&input)
    }
    .expect("failed to read the vector file");

    println!("{} placemarks in layers {:?}", frame.len(), frame.layers());

    let mut map = WebMap::new((44.7, 28.3), 11);
    for record in &frame {
        let name = record
            .name
            .clone()
            .unwrap_or_else(|| record.layer.clone());
        if let Err(error) = map.add_geometry(&record.geometry, name) {
            eprintln!("skipping a record: {error}");
        }
    }

    map.write(&output).expect("failed to write the map");
    println!("wrote {output}");
}
