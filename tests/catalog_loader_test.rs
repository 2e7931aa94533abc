// ==========================================
// CatalogLoader 集成测试
// ==========================================
// 测试目标: 目录 / 价格表 / 模板加载与数据质量处理
// ==========================================

mod test_helpers;

use m2o_masterdata::config::{PriceTableSource, SheetSource};
use m2o_masterdata::domain::{BaseColor, Currency, DqLevel, Market, PriceLookup};
use m2o_masterdata::importer::ImportError;
use m2o_masterdata::CatalogLoader;
use std::path::Path;
use test_helpers::{default_fixture, load_session, CATALOG_CSV};

#[test]
fn test_load_default_fixture() {
    let fixture = default_fixture();
    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();

    assert_eq!(loaded.catalog.rows.len(), 6);
    assert!(loaded.dq_report.violations.is_empty());
    assert_eq!(loaded.template_columns.len(), 8);

    let first = &loaded.catalog.rows[0];
    assert_eq!(first.item_no, "1001");
    assert_eq!(first.article_no.as_deref(), Some("A100"));
    assert_eq!(first.base_color, BaseColor::new("Black"));
    assert_eq!(first.image_url.as_deref(), Some("http://img/1001.jpg"));
    assert_eq!(first.extra_value("EAN"), Some("5710000000011"));

    assert_eq!(loaded.catalog.rows[2].market, Market::Eu);
    assert!(loaded.catalog.rows[4].base_color.is_none());

    let eu = &loaded.catalog.eu_prices;
    assert_eq!(eu.wholesale.lookup("A100", Currency::Eur), PriceLookup::BlankCell);
    assert_eq!(eu.wholesale.lookup("A100", Currency::Dkk), PriceLookup::Found(1490.0));
    assert_eq!(eu.wholesale.lookup("A999", Currency::Eur), PriceLookup::MissingArticle);
    assert_eq!(eu.wholesale.lookup("A100", Currency::Gbp), PriceLookup::MissingColumn);

    let uk = &loaded.catalog.uk_prices;
    assert_eq!(uk.retail.lookup("A103", Currency::IeEur), PriceLookup::Found(430.0));
}

#[test]
fn test_duplicate_and_incomplete_rows_reported() {
    let fixture = default_fixture();
    let mut lines: Vec<&str> = CATALOG_CSV.to_vec();
    lines.push("1001,A100,Outline,Sofa,3-seater,,Fiord,151,Black,,,");
    lines.push("3001,C300,Fiber,,Armchair,,Remix,123,,,,");
    lines.push(",C301,Fiber,Chair,Armchair,,Remix,200,,,,");
    fixture.rewrite("catalog.csv", &lines);

    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();

    assert_eq!(loaded.catalog.rows.len(), 6);
    let summary = &loaded.dq_report.summary;
    assert_eq!(summary.conflict, 1);
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.warning, 1);

    let blocked = loaded
        .dq_report
        .violations
        .iter()
        .find(|v| v.level == DqLevel::Error)
        .unwrap();
    assert_eq!(blocked.key.as_deref(), Some("3001"));
    assert_eq!(blocked.field, "product_type");
}

#[test]
fn test_missing_required_column_fails_whole_load() {
    let fixture = default_fixture();
    fixture.rewrite(
        "catalog.csv",
        &[
            "Item No,Article No,Product Family,Product Type,Product Model,Upholstery Type,Base Color",
            "1001,A100,Outline,Sofa,3-seater,Fiord,Black",
        ],
    );

    let err = CatalogLoader::with_defaults().load(&fixture.config).unwrap_err();
    match err {
        ImportError::MissingColumn { column, .. } => assert_eq!(column, "Color"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_price_file_fails_whole_load() {
    let mut fixture = default_fixture();
    fixture.config.sources.uk_prices.retail =
        SheetSource::new(fixture.path("missing.csv"), None);

    let err = CatalogLoader::with_defaults().load(&fixture.config).unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_price_sheet_without_region_currencies_rejected() {
    let fixture = default_fixture();
    fixture.rewrite("eu-retail.csv", &["Article No,GBP", "A100,360"]);

    let err = CatalogLoader::with_defaults().load(&fixture.config).unwrap_err();
    assert!(matches!(err, ImportError::NoCurrencyColumns(_)));
}

#[test]
fn test_price_column_override() {
    let mut fixture = default_fixture();
    fixture.rewrite(
        "uk-wholesale.csv",
        &["Article No,GBP,EUR (Ireland)", "A100,180,205"],
    );
    fixture
        .config
        .columns
        .price_column_overrides
        .insert("IE - EUR".to_string(), "EUR (Ireland)".to_string());

    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();
    assert_eq!(
        loaded.catalog.uk_prices.wholesale.lookup("A100", Currency::IeEur),
        PriceLookup::Found(205.0)
    );
}

#[test]
fn test_unparseable_price_is_warning() {
    let fixture = default_fixture();
    fixture.rewrite(
        "eu-wholesale.csv",
        &["Article No,EUR,DKK", "A100,n/a,1490", "A101,abc,1570"],
    );

    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();
    let eu = &loaded.catalog.eu_prices.wholesale;

    // "n/a" 为空值标记,"abc" 为无效数值
    assert_eq!(eu.lookup("A100", Currency::Eur), PriceLookup::BlankCell);
    assert_eq!(eu.lookup("A101", Currency::Eur), PriceLookup::BlankCell);
    assert_eq!(eu.lookup("A101", Currency::Dkk), PriceLookup::Found(1570.0));
    assert_eq!(loaded.dq_report.summary.warning, 1);
}

#[test]
fn test_price_workbook_sheets_selected_by_name() {
    let mut fixture = default_fixture();
    let workbook = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/eu-prices.xlsx");
    fixture.config.sources.eu_prices = PriceTableSource {
        wholesale: SheetSource::new(&workbook, Some("wholesale")),
        retail: SheetSource::new(&workbook, Some("RETAIL")),
    };

    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();
    let eu = &loaded.catalog.eu_prices;
    assert_eq!(eu.wholesale.lookup("A100", Currency::Eur), PriceLookup::BlankCell);
    assert_eq!(eu.wholesale.lookup("B200", Currency::Eur), PriceLookup::Found(99.95));
    assert_eq!(eu.retail.lookup("A101", Currency::Dkk), PriceLookup::Found(3150.0));
}

#[test]
fn test_missing_price_sheet_fails_whole_load() {
    let mut fixture = default_fixture();
    let workbook = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/eu-prices.xlsx");
    fixture.config.sources.eu_prices = PriceTableSource {
        wholesale: SheetSource::new(&workbook, Some("Wholesale")),
        retail: SheetSource::new(&workbook, Some("Retail 2024")),
    };

    let err = CatalogLoader::with_defaults().load(&fixture.config).unwrap_err();
    assert!(matches!(err, ImportError::SheetNotFound { ref sheet, .. } if sheet == "Retail 2024"));
}

#[test]
fn test_market_column_headed_currency() {
    let fixture = default_fixture();
    fixture.rewrite(
        "catalog.csv",
        &[
            "Item No,Article No,Product Family,Product Type,Product Model,Upholstery Type,Color,Base Color,Currency",
            "1001,A100,Outline,Sofa,3-seater,Fiord,151,Black,EU",
            "1005,A104,Outline,Sofa,2-seater,Fiord,151,Black,UK",
        ],
    );

    let session = load_session(&fixture, Currency::Eur);
    assert_eq!(session.catalog().rows[1].market, Market::Uk);
    assert!(session.dq_report().violations.is_empty());

    let models: Vec<&str> = session
        .combinations()
        .iter()
        .map(|c| c.key.product_model.as_str())
        .collect();
    assert_eq!(models, vec!["3-seater"]);
}

#[test]
fn test_missing_market_column_is_warning() {
    let fixture = default_fixture();
    fixture.rewrite(
        "catalog.csv",
        &[
            "Item No,Article No,Product Family,Product Type,Product Model,Upholstery Type,Color",
            "2001,B200,Fiber,Chair,Armchair,Remix,123",
        ],
    );

    let loaded = CatalogLoader::with_defaults().load(&fixture.config).unwrap();
    assert_eq!(loaded.catalog.rows.len(), 1);
    assert_eq!(loaded.dq_report.summary.warning, 1);

    let violation = &loaded.dq_report.violations[0];
    assert_eq!(violation.level, DqLevel::Warning);
    assert_eq!(violation.field, "market");
    assert_eq!(violation.key, None);
}
