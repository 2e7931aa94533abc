// ==========================================
// M2O 主数据配置系统 - 目录加载器
// ==========================================
// 职责: 整合导入流程,从文件到会话级只读目录
// 流程: 解析 → 列检查 → 映射 → 清洗/校验 → 组装 Catalog
// 红线: 加载为全有或全无,任一文件/工作表/列失败即返回 Err
// ==========================================

use crate::config::{price_column_for, AppConfig, PriceTableSource, SheetSource};
use crate::domain::catalog::{normalize_header, Catalog, CatalogField, PriceSheet, PriceTable};
use crate::domain::dq::{DqLevel, DqReport, DqViolation};
use crate::domain::types::{Currency, PriceKind, Region};
use crate::importer::dq_validator::DqValidator as DefaultDqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{has_column, FieldMapper as DefaultFieldMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DqValidator, FieldMapper, FileParser, RawSheet};
use tracing::{debug, info, instrument, warn};

// ==========================================
// LoadedCatalog - 加载结果
// ==========================================
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub template_columns: Vec<String>, // 输出模板列（按原顺序,已去除空列名）
    pub dq_report: DqReport,
}

// ==========================================
// CatalogLoader - 目录与价格表加载器
// ==========================================
pub struct CatalogLoader {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    dq_validator: Box<dyn DqValidator>,
}

impl CatalogLoader {
    pub fn new(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        dq_validator: Box<dyn DqValidator>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            dq_validator,
        }
    }

    /// 使用默认组件（按扩展名解析 + 别名映射 + 标准 DQ 规则）
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(UniversalFileParser),
            Box::new(DefaultFieldMapper),
            Box::new(DefaultDqValidator::new()),
        )
    }

    /// 加载目录、两个区域价格表与输出模板
    #[instrument(skip_all, fields(catalog = %config.sources.catalog.path.display()))]
    pub fn load(&self, config: &AppConfig) -> ImportResult<LoadedCatalog> {
        info!("开始加载目录与价格表");

        let mut dq_report = DqReport::default();

        // === 步骤 1: 目录 ===
        let catalog_sheet = self.parse(&config.sources.catalog)?;
        let source_columns: Vec<String> = catalog_sheet
            .headers
            .iter()
            .filter(|h| !h.is_empty())
            .cloned()
            .collect();

        for field in CatalogField::ALL.iter().filter(|f| f.is_required_column()) {
            if !has_column(&catalog_sheet.headers, field.aliases()) {
                return Err(ImportError::MissingColumn {
                    source_name: catalog_sheet.source.clone(),
                    column: field.canonical_header().to_string(),
                });
            }
        }

        let total_rows = catalog_sheet.rows.len();
        let records = catalog_sheet
            .rows
            .iter()
            .map(|row| self.field_mapper.map_catalog_record(row))
            .collect();
        let (rows, mut violations) = self
            .dq_validator
            .validate_catalog(&catalog_sheet.source, records);

        // 无市场列: 所有行在两个区域均可见
        if !has_column(&catalog_sheet.headers, CatalogField::Market.aliases()) {
            warn!(source = %catalog_sheet.source, "目录缺少市场列,市场过滤不生效");
            violations.insert(
                0,
                DqViolation {
                    source: catalog_sheet.source.clone(),
                    row_number: 1,
                    key: None,
                    level: DqLevel::Warning,
                    field: "market".to_string(),
                    message: "目录缺少市场列,所有行在 EU 与 UK/IE 均可见".to_string(),
                },
            );
        }
        info!(total_rows, accepted = rows.len(), "目录解析完成");
        dq_report.merge(DqReport::from_violations(total_rows, rows.len(), violations));

        // === 步骤 2: 价格表 ===
        let (eu_prices, eu_report) =
            self.load_price_table(Region::Eu, &config.sources.eu_prices, config)?;
        dq_report.merge(eu_report);

        let (uk_prices, uk_report) =
            self.load_price_table(Region::UkIe, &config.sources.uk_prices, config)?;
        dq_report.merge(uk_report);

        // === 步骤 3: 输出模板 ===
        let template_columns = self.load_template(&config.sources.template)?;
        debug!(columns = template_columns.len(), "输出模板读取完成");

        if !dq_report.violations.is_empty() {
            warn!(
                blocked = dq_report.summary.blocked,
                warning = dq_report.summary.warning,
                conflict = dq_report.summary.conflict,
                "导入存在数据质量问题"
            );
        }

        info!(
            catalog_rows = rows.len(),
            eu_articles = eu_prices.wholesale.len(),
            uk_articles = uk_prices.wholesale.len(),
            "目录加载完成"
        );

        Ok(LoadedCatalog {
            catalog: Catalog {
                rows,
                eu_prices,
                uk_prices,
                source_columns,
            },
            template_columns,
            dq_report,
        })
    }

    fn parse(&self, source: &SheetSource) -> ImportResult<RawSheet> {
        self.file_parser
            .parse_sheet(&source.path, source.sheet.as_deref())
    }

    fn load_price_table(
        &self,
        region: Region,
        source: &PriceTableSource,
        config: &AppConfig,
    ) -> ImportResult<(PriceTable, DqReport)> {
        let (wholesale, mut report) =
            self.load_price_sheet(region, PriceKind::Wholesale, &source.wholesale, config)?;
        let (retail, retail_report) =
            self.load_price_sheet(region, PriceKind::Retail, &source.retail, config)?;
        report.merge(retail_report);

        Ok((
            PriceTable {
                region,
                wholesale,
                retail,
            },
            report,
        ))
    }

    /// 读取单个价格工作表,只收录本区域币种列
    fn load_price_sheet(
        &self,
        region: Region,
        kind: PriceKind,
        source: &SheetSource,
        config: &AppConfig,
    ) -> ImportResult<(PriceSheet, DqReport)> {
        let sheet = self.parse(source)?;

        if !has_column(&sheet.headers, CatalogField::ArticleNo.aliases()) {
            return Err(ImportError::MissingColumn {
                source_name: sheet.source.clone(),
                column: CatalogField::ArticleNo.canonical_header().to_string(),
            });
        }

        let currency_columns: Vec<(Currency, String)> = Currency::ALL
            .into_iter()
            .filter(|c| c.region() == region)
            .filter_map(|currency| {
                let wanted = normalize_header(&price_column_for(config, currency));
                sheet
                    .headers
                    .iter()
                    .find(|h| normalize_header(h) == wanted)
                    .map(|header| (currency, header.clone()))
            })
            .collect();

        if currency_columns.is_empty() {
            return Err(ImportError::NoCurrencyColumns(sheet.source));
        }

        let currencies: Vec<Currency> = currency_columns.iter().map(|(c, _)| *c).collect();
        debug!(source = %sheet.source, ?currencies, "识别币种列");

        let total_rows = sheet.rows.len();
        let records = sheet
            .rows
            .iter()
            .map(|row| self.field_mapper.map_price_record(row, &currency_columns))
            .collect();
        let (price_sheet, violations) =
            self.dq_validator
                .build_price_sheet(&sheet.source, kind, &currencies, records);

        let accepted = price_sheet.len();
        Ok((
            price_sheet,
            DqReport::from_violations(total_rows, accepted, violations),
        ))
    }

    /// 读取输出模板表头（空列名忽略）
    fn load_template(&self, source: &SheetSource) -> ImportResult<Vec<String>> {
        let sheet = self.parse(source)?;
        let columns: Vec<String> = sheet.headers.into_iter().filter(|h| !h.is_empty()).collect();
        if columns.is_empty() {
            return Err(ImportError::EmptyTable(sheet.source));
        }
        Ok(columns)
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::with_defaults()
    }
}
