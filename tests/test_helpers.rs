// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成目录 / 价格表 / 模板 CSV,并构造指向它们的配置
// ==========================================
#![allow(dead_code)]

use m2o_masterdata::config::{AppConfig, PriceTableSource, SheetSource};
use m2o_masterdata::domain::{CombinationKey, Currency};
use m2o_masterdata::{CatalogLoader, ConfiguratorSession};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 默认目录
///
/// EUR 下:
/// - Outline 3-seater (无方向): Black / White 两个底座,需要消歧（1004 为 UK 专供）
/// - Outline 3-seater Left: 仅 Black（EU 专供）
/// - Fiber Armchair 123 / 133: 无底座颜色
pub const CATALOG_CSV: &[&str] = &[
    "Item No,Article No,Product Family,Product Type,Product Model,Sofa Direction,Upholstery Type,Color,Base Color,Market,Image URL,EAN",
    "1001,A100,Outline,Sofa,3-seater,,Fiord,151,Black,,http://img/1001.jpg,5710000000011",
    "1002,A101,Outline,Sofa,3-seater,,Fiord,151,White,,,5710000000028",
    "1003,A102,Outline,Sofa,3-seater,Left,Fiord,151,Black,EU,,5710000000035",
    "1004,A103,Outline,Sofa,3-seater,,Fiord,151,Oak,UK,,",
    "2001,B200,Fiber,Chair,Armchair,,Remix,123,,,,",
    "2002,B201,Fiber,Chair,Armchair,,Remix,133,,,,",
];

// A100 缺少 EUR 批发价
pub const EU_WHOLESALE_CSV: &[&str] = &[
    "Article No,EUR,DKK,SEK,NOK,CHF",
    "A100,,1490,2090,2150,199",
    "A101,210.5,1570,2190,2250,209",
    "A102,220,1640,2290,2350,219",
    "B200,99.95,745,1045,1075,99",
    "B201,99.95,745,1045,1075,99",
];

pub const EU_RETAIL_CSV: &[&str] = &[
    "Article No,EUR,DKK,SEK,NOK,CHF",
    "A100,399,2990,4190,4290,399",
    "A101,420,3150,4390,4490,419",
    "A102,440,3290,4590,4690,439",
    "B200,199,1495,2095,2145,199",
    "B201,199,1495,2095,2145,199",
];

pub const UK_WHOLESALE_CSV: &[&str] = &[
    "Article No,GBP,IE - EUR",
    "A100,180,205",
    "A101,185,210",
    "A103,190,215",
    "B200,85,99",
    "B201,85,99",
];

pub const UK_RETAIL_CSV: &[&str] = &[
    "Article No,GBP,IE - EUR",
    "A100,360,410",
    "A101,370,420",
    "A103,380,430",
    "B200,170,198",
    "B201,170,198",
];

pub const TEMPLATE_HEADER: &str =
    "Item No,Display Name,Product Family,Base Color,EAN,Currency,Wholesale price,Retail price";

// ==========================================
// Fixture - 临时数据目录 + 配置
// ==========================================
pub struct Fixture {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Fixture {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// 覆写某个数据文件（保持配置不变）
    pub fn rewrite(&self, name: &str, lines: &[&str]) {
        write_csv(self.dir.path(), name, lines);
    }
}

/// 写入 CSV 文件
pub fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("写入测试文件失败");
    path
}

/// 默认数据 + 默认模板
pub fn default_fixture() -> Fixture {
    fixture_with_template(TEMPLATE_HEADER)
}

/// 默认数据 + 指定模板表头
pub fn fixture_with_template(template_header: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let root = dir.path();

    let catalog = write_csv(root, "catalog.csv", CATALOG_CSV);
    let eu_wholesale = write_csv(root, "eu-wholesale.csv", EU_WHOLESALE_CSV);
    let eu_retail = write_csv(root, "eu-retail.csv", EU_RETAIL_CSV);
    let uk_wholesale = write_csv(root, "uk-wholesale.csv", UK_WHOLESALE_CSV);
    let uk_retail = write_csv(root, "uk-retail.csv", UK_RETAIL_CSV);
    let template = write_csv(root, "template.csv", &[template_header]);

    let mut config = AppConfig::default();
    config.sources.catalog = SheetSource::new(catalog, None);
    config.sources.eu_prices = PriceTableSource {
        wholesale: SheetSource::new(eu_wholesale, None),
        retail: SheetSource::new(eu_retail, None),
    };
    config.sources.uk_prices = PriceTableSource {
        wholesale: SheetSource::new(uk_wholesale, None),
        retail: SheetSource::new(uk_retail, None),
    };
    config.sources.template = SheetSource::new(template, None);
    config.output.path = root.join("export.csv");

    Fixture { dir, config }
}

/// 加载目录并创建会话
pub fn load_session(fixture: &Fixture, currency: Currency) -> ConfiguratorSession {
    let loaded = CatalogLoader::with_defaults()
        .load(&fixture.config)
        .expect("目录加载失败");
    ConfiguratorSession::new(loaded, fixture.config.columns.clone(), currency)
}

// ==========================================
// 组合键
// ==========================================

pub fn key(
    family: &str,
    product_type: &str,
    model: &str,
    direction: Option<&str>,
    upholstery: &str,
    color: &str,
) -> CombinationKey {
    CombinationKey {
        product_family: family.to_string(),
        product_type: product_type.to_string(),
        product_model: model.to_string(),
        sofa_direction: direction.map(str::to_string),
        upholstery_type: upholstery.to_string(),
        color: color.to_string(),
    }
}

/// Outline 3-seater（无方向,需要消歧）
pub fn outline_sofa() -> CombinationKey {
    key("Outline", "Sofa", "3-seater", None, "Fiord", "151")
}

/// Outline 3-seater Left（仅 EU 可见,单一底座）
pub fn outline_sofa_left() -> CombinationKey {
    key("Outline", "Sofa", "3-seater", Some("Left"), "Fiord", "151")
}

pub fn fiber_chair(color: &str) -> CombinationKey {
    key("Fiber", "Chair", "Armchair", None, "Remix", color)
}
