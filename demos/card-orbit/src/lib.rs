use wasm_bindgen::prelude::*;

mod cards;
mod stage;
use stage::CardOrbit;

orbit_web::export_stage!(CardOrbit, "card-orbit");
