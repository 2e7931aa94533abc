// ==========================================
// 选择文件 / 配置文件集成测试
// ==========================================
// 测试目标: 配置加载 + 选择文件重放 + 批量导出
// ==========================================

mod test_helpers;

use m2o_masterdata::config::{ConfigError, ConfigManager};
use m2o_masterdata::domain::Currency;
use m2o_masterdata::engine::{EngineError, OutputCell};
use m2o_masterdata::exporter::CsvExporter;
use m2o_masterdata::SelectionFile;
use std::fs;
use test_helpers::{default_fixture, load_session, outline_sofa};

#[test]
fn test_selection_file_replay() {
    let fixture = default_fixture();
    let selection_path = fixture.path("selection.json");
    fs::write(
        &selection_path,
        r#"{
            "currency": "IE - EUR",
            "selections": [
                {
                    "product_family": "Outline",
                    "product_type": "Sofa",
                    "product_model": "3-seater",
                    "upholstery_type": "Fiord",
                    "color": "151",
                    "base_colors": ["Oak", "Black"]
                },
                {
                    "product_family": "Fiber",
                    "product_type": "Chair",
                    "product_model": "Armchair",
                    "upholstery_type": "Remix",
                    "color": "123"
                }
            ],
            "removed_items": ["1001"]
        }"#,
    )
    .unwrap();

    let selection = SelectionFile::load(&selection_path).unwrap();
    let mut session = load_session(&fixture, Currency::Eur);
    selection.apply(&mut session).unwrap();

    assert_eq!(session.currency(), Currency::IeEur);
    let outcome = session.export().unwrap();
    let items: Vec<&str> = outcome.items.iter().map(|i| i.item_no()).collect();
    assert_eq!(items, vec!["1004", "2001"]);
    assert_eq!(
        outcome.table.cell(0, "Wholesale price (IE - EUR)"),
        Some(&OutputCell::Number(215.0))
    );

    let output = fixture.config.output.path.clone();
    CsvExporter::write_file(&outcome.table, &output).unwrap();
    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_selection_file_with_family_colors() {
    let fixture = default_fixture();
    let selection: SelectionFile = serde_json::from_str(
        r#"{
            "selections": [
                {
                    "product_family": "Outline",
                    "product_type": "Sofa",
                    "product_model": "3-seater",
                    "upholstery_type": "Fiord",
                    "color": "151"
                }
            ],
            "family_base_colors": { "Outline": ["White"] }
        }"#,
    )
    .unwrap();

    let mut session = load_session(&fixture, Currency::Eur);
    selection.apply(&mut session).unwrap();

    assert_eq!(session.currency(), Currency::Eur);
    assert!(session.selection().is_selected(&outline_sofa()));
    let preview = session.finalize_preview().unwrap();
    assert_eq!(preview.items.len(), 1);
    assert_eq!(preview.items[0].item_no(), "1002");
}

#[test]
fn test_selection_file_invalid_entry_rejected() {
    let fixture = default_fixture();
    let selection: SelectionFile = serde_json::from_str(
        r#"{
            "selections": [
                {
                    "product_family": "Outline",
                    "product_type": "Sofa",
                    "product_model": "3-seater",
                    "sofa_direction": "Left",
                    "upholstery_type": "Fiord",
                    "color": "151"
                }
            ],
            "currency": "GBP"
        }"#,
    )
    .unwrap();

    // Left 组合仅 EU 可见
    let mut session = load_session(&fixture, Currency::Eur);
    let err = selection.apply(&mut session).unwrap_err();
    assert!(matches!(err, EngineError::UnknownCombination(_)));
}

#[test]
fn test_config_file_resolves_relative_paths() {
    let fixture = default_fixture();
    let config_path = fixture.path("m2o_config.json");
    fs::write(
        &config_path,
        r#"{
            "default_currency": "NOK",
            "sources": {
                "catalog": { "path": "catalog.csv" },
                "eu_prices": {
                    "wholesale": { "path": "eu-wholesale.csv" },
                    "retail": { "path": "eu-retail.csv" }
                },
                "uk_prices": {
                    "wholesale": { "path": "uk-wholesale.csv" },
                    "retail": { "path": "uk-retail.csv" }
                },
                "template": { "path": "template.csv" }
            },
            "output": { "path": "out/export.csv", "report_path": "out/report.json" }
        }"#,
    )
    .unwrap();

    let manager = ConfigManager::load_from_path(&config_path).unwrap();
    assert_eq!(manager.default_currency(), Some(Currency::Nok));
    assert_eq!(manager.config().sources.catalog.path, fixture.path("catalog.csv"));
    assert_eq!(manager.config().output.path, fixture.path("out/export.csv"));

    let loaded = m2o_masterdata::CatalogLoader::with_defaults()
        .load(manager.config())
        .unwrap();
    assert_eq!(loaded.catalog.rows.len(), 6);
}

#[test]
fn test_config_file_with_unknown_currency_rejected() {
    let fixture = default_fixture();
    let config_path = fixture.path("bad_config.json");
    fs::write(&config_path, r#"{ "default_currency": "USD" }"#).unwrap();

    let err = ConfigManager::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
