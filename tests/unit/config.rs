use std::io::Cursor;

use super::*;
use crate::beams::field::{Intensity, stacked_blur_px};

#[test]
fn default_config_matches_the_published_page() {
    let cfg = FolioConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.header.name, "Sofia Elizondo Piña");
    assert_eq!(cfg.header.subtitle, "Portfolio");
    assert_eq!(cfg.cards.len(), 4);
    assert_eq!(cfg.cards[0].link, "https://sintmex.netlify.app/");
    assert_eq!(cfg.carousel.nav_step, 300.0);
    assert_eq!(cfg.beams.intensity, Intensity::Medium);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{
        "header": { "name": "Ada" },
        "cards": [
            { "src": "a.png", "title": "A", "description": "first", "link": "https://a.example" }
        ],
        "beams": { "intensity": "strong" }
    }"#;
    let cfg = FolioConfig::from_reader(Cursor::new(json)).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.header.name, "Ada");
    assert_eq!(cfg.header.subtitle, "Portfolio");
    assert_eq!(cfg.cards.len(), 1);
    assert_eq!(cfg.beams.intensity, Intensity::Strong);
    assert_eq!(cfg.beams.blur_px, stacked_blur_px());
    assert_eq!(cfg.carousel.layout.breakpoint, 768.0);
}

#[test]
fn empty_object_is_the_default() {
    let cfg = FolioConfig::from_reader(Cursor::new("{}")).unwrap();
    assert_eq!(cfg, FolioConfig::default());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = FolioConfig::from_reader(Cursor::new("{ not json")).unwrap_err();
    assert!(matches!(err, FolioError::Serde(_)));

    let err = FolioConfig::from_reader(Cursor::new(r#"{ "cardz": [] }"#)).unwrap_err();
    assert!(matches!(err, FolioError::Serde(_)));
}

#[test]
fn validate_names_the_offending_card() {
    let mut cfg = FolioConfig::default();
    cfg.cards[2].link = String::new();
    let msg = cfg.validate().unwrap_err().to_string();
    assert!(msg.contains("cards[2]"), "{msg}");
}

#[test]
fn validate_checks_nested_sections() {
    let mut cfg = FolioConfig::default();
    cfg.carousel.nav_step = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = FolioConfig::default();
    cfg.beams.blur_px = f64::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = FolioConfig::default();
    cfg.carousel.layout.wide.card_width = -1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn empty_card_list_is_valid() {
    let cfg = FolioConfig {
        cards: Vec::new(),
        ..FolioConfig::default()
    };
    cfg.validate().unwrap();
}

#[test]
fn from_path_reports_missing_file() {
    let err = FolioConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("not/here.json"));
}

#[test]
fn serialized_config_parses_back_identically() {
    let cfg = FolioConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let back = FolioConfig::from_reader(Cursor::new(json)).unwrap();
    assert_eq!(back, cfg);
}
