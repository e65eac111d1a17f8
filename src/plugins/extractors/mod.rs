// Store extractor implementations
mod dom;

pub mod amazon;
pub mod americanas;
pub mod boadica;
pub mod casasbahia;
pub mod fastshop;
pub mod kabum;
pub mod magazineluiza;

use serde::{Deserialize, Serialize};

use crate::plugins::traits::{Extraction, Extractor};
use crate::utils::error::Result;

/// One variant per page layout. Several stores share a layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StoreExtractor {
    Boadica,
    MagazineLuiza,
    Americanas,
    CasasBahia,
    Kabum,
    Fastshop,
    Amazon,
}

impl StoreExtractor {
    /// Store domains supported out of the box and the layout each one uses.
    pub const DEFAULT_STORES: &'static [(&'static str, StoreExtractor)] = &[
        ("boadica.com.br", StoreExtractor::Boadica),
        ("magazineluiza.com.br", StoreExtractor::MagazineLuiza),
        ("submarino.com.br", StoreExtractor::Americanas),
        ("americanas.com.br", StoreExtractor::Americanas),
        ("shoptime.com.br", StoreExtractor::Americanas),
        ("casasbahia.com.br", StoreExtractor::CasasBahia),
        ("extra.com.br", StoreExtractor::CasasBahia),
        ("pontofrio.com.br", StoreExtractor::CasasBahia),
        ("kabum.com.br", StoreExtractor::Kabum),
        ("fastshop.com.br", StoreExtractor::Fastshop),
        ("amazon.com.br", StoreExtractor::Amazon),
    ];
}

impl Extractor for StoreExtractor {
    fn extract(&self, document: &str) -> Result<Extraction> {
        match self {
            StoreExtractor::Boadica => boadica::extract(document),
            StoreExtractor::MagazineLuiza => magazineluiza::extract(document),
            StoreExtractor::Americanas => americanas::extract(document),
            StoreExtractor::CasasBahia => casasbahia::extract(document),
            StoreExtractor::Kabum => kabum::extract(document),
            StoreExtractor::Fastshop => fastshop::extract(document),
            StoreExtractor::Amazon => amazon::extract(document),
        }
    }
}
