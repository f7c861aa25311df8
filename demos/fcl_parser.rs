use std::{env::args_os, fs, io};

use fcl2svg::fcl::Fcl;

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let path = args_os().nth(1).expect("missing argument: path to .fcl");
    let fcl = Fcl::parse(&fs::read(path).unwrap()).expect("unsuccessful parse");

    println!("{}", serde_json::to_string(&fcl).unwrap());
}
