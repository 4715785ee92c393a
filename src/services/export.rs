use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

use crate::domain::build::{BuildSelection, ResolvedBuild};
use crate::repository::ComponentReader;
use crate::services::builds::resolve_selection;

use super::{ServiceError, ServiceResult};

const SHEET_NAME: &str = "Mi Configuración";
const HEADERS: [&str; 5] = ["Categoría", "Componente", "Marca", "Precio", "Link"];
// Categoría, Componente, Marca, Precio, Link.
const COLUMN_WIDTHS: [f64; 5] = [18.0, 45.0, 20.0, 14.0, 60.0];

/// One spreadsheet row for a selected component.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub category: String,
    pub component: String,
    pub brand: String,
    pub price: f64,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Csv,
    Xlsx,
}

impl TryFrom<&str> for DownloadFormat {
    type Error = DownloadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(DownloadError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download format: {0}")]
    InvalidFormat(String),
    #[error("failed to render csv")]
    CsvRender,
    #[error("failed to render xlsx")]
    XlsxRender,
}

/// Expands a resolved build into export rows, one per selected component.
pub fn build_export_rows(resolved: &ResolvedBuild) -> Vec<ExportRow> {
    resolved
        .lines()
        .iter()
        .map(|line| ExportRow {
            category: line.category.label().to_string(),
            component: line.component.name.as_str().to_string(),
            brand: line.component.brand.as_str().to_string(),
            price: line.component.best_price(),
            url: line
                .component
                .best_price_entry()
                .map(|entry| entry.url.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn render_xlsx(rows: &[ExportRow], total: f64) -> Result<DownloadFile, DownloadError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|_| DownloadError::XlsxRender)?;

    for (col_idx, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col_idx as u16, *width)
            .map_err(|_| DownloadError::XlsxRender)?;
    }

    let bold = Format::new().set_bold();
    for (col_idx, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, *header, &bold)
            .map_err(|_| DownloadError::XlsxRender)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        worksheet
            .write_string(sheet_row, 0, &row.category)
            .map_err(|_| DownloadError::XlsxRender)?;
        worksheet
            .write_string(sheet_row, 1, &row.component)
            .map_err(|_| DownloadError::XlsxRender)?;
        worksheet
            .write_string(sheet_row, 2, &row.brand)
            .map_err(|_| DownloadError::XlsxRender)?;
        worksheet
            .write_number(sheet_row, 3, row.price)
            .map_err(|_| DownloadError::XlsxRender)?;
        worksheet
            .write_string(sheet_row, 4, &row.url)
            .map_err(|_| DownloadError::XlsxRender)?;
    }

    let total_row = (rows.len() + 1) as u32;
    worksheet
        .write_string_with_format(total_row, 2, "Total", &bold)
        .map_err(|_| DownloadError::XlsxRender)?;
    worksheet
        .write_number_with_format(total_row, 3, total, &bold)
        .map_err(|_| DownloadError::XlsxRender)?;

    let bytes = workbook
        .save_to_buffer()
        .map_err(|_| DownloadError::XlsxRender)?;

    Ok(DownloadFile {
        file_name: "mi-configuracion.xlsx".to_string(),
        content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        bytes,
    })
}

fn render_csv(rows: &[ExportRow], total: f64) -> Result<DownloadFile, DownloadError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(HEADERS)
        .map_err(|_| DownloadError::CsvRender)?;

    for row in rows {
        writer
            .write_record([
                escape_csv_cell(&row.category),
                escape_csv_cell(&row.component),
                escape_csv_cell(&row.brand),
                row.price.to_string(),
                escape_csv_cell(&row.url),
            ])
            .map_err(|_| DownloadError::CsvRender)?;
    }

    let total_cell = total.to_string();
    writer
        .write_record(["", "", "Total", total_cell.as_str(), ""])
        .map_err(|_| DownloadError::CsvRender)?;

    let bytes = writer.into_inner().map_err(|_| DownloadError::CsvRender)?;

    Ok(DownloadFile {
        file_name: "mi-configuracion.csv".to_string(),
        content_type: "text/csv; charset=utf-8",
        bytes,
    })
}

fn escape_csv_cell(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

/// Renders the current selection as a downloadable spreadsheet.
pub fn export_build<R>(
    format: &str,
    selection: &BuildSelection,
    repo: &R,
) -> ServiceResult<DownloadFile>
where
    R: ComponentReader,
{
    let format = DownloadFormat::try_from(format)
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    if selection.is_empty() {
        return Err(ServiceError::Form(
            "Selecciona al menos un componente antes de exportar".to_string(),
        ));
    }

    let resolved = resolve_selection(selection, repo)?;
    let rows = build_export_rows(&resolved);
    let total = resolved.total_price();

    let rendered = match format {
        DownloadFormat::Csv => render_csv(&rows, total),
        DownloadFormat::Xlsx => render_xlsx(&rows, total),
    };

    rendered.map_err(|e| {
        log::error!("Failed to render build download: {e}");
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::BuildSelection;
    use crate::domain::component::{Component, PriceEntry};
    use crate::domain::types::{
        BrandName, Category, ComponentId, ComponentName, ComponentPrice, ComponentSku,
        ComponentSlug, ImageUrl, OfferUrl, StockCount, StoreId,
    };
    use chrono::DateTime;
    use std::collections::HashMap;

    fn sample_component(name: &str, category: Category, best: f64) -> Component {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Component {
            id: ComponentId::new(1).unwrap(),
            slug: ComponentSlug::from_name(name).unwrap(),
            name: ComponentName::new(name).unwrap(),
            sku: ComponentSku::new("SKU1").unwrap(),
            brand: BrandName::new("Marca").unwrap(),
            category,
            description: None,
            image_url: ImageUrl::new("https://example.com/img.jpg").unwrap(),
            price: ComponentPrice::new(best).unwrap(),
            stock: StockCount::new(5).unwrap(),
            specs: Default::default(),
            prices: vec![PriceEntry {
                store_id: StoreId::new("store-1").unwrap(),
                price: ComponentPrice::new(best).unwrap(),
                url: OfferUrl::new("https://store-1.example.com/p").unwrap(),
            }],
            price_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn resolved_with(components: Vec<(&str, Category, f64)>) -> ResolvedBuild {
        let mut selection = BuildSelection::default();
        let mut catalog = HashMap::new();
        for (name, category, price) in components {
            let component = sample_component(name, category, price);
            selection.select(category, component.slug.clone());
            catalog.insert(component.slug.clone(), component);
        }
        ResolvedBuild::resolve(&selection, &catalog)
    }

    #[test]
    fn one_row_per_selected_component() {
        let resolved = resolved_with(vec![
            ("Core i9", Category::Cpu, 589_990.0),
            ("RTX 4090", Category::Gpu, 1_599_990.0),
            ("Fury 32GB", Category::Ram, 89_990.0),
        ]);

        let rows = build_export_rows(&resolved);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Procesador");
        assert_eq!(rows[0].url, "https://store-1.example.com/p");
    }

    #[test]
    fn csv_render_appends_exactly_one_total_row() {
        let resolved = resolved_with(vec![
            ("Core i9", Category::Cpu, 589_990.0),
            ("RTX 4090", Category::Gpu, 1_599_990.0),
        ]);
        let rows = build_export_rows(&resolved);

        let file = render_csv(&rows, resolved.total_price()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        let lines: Vec<&str> = text.trim_end().lines().collect();

        // header + 2 components + total
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Categoría"));
        assert!(lines[3].contains("Total"));
        assert!(lines[3].contains("2189980"));
    }

    #[test]
    fn xlsx_render_produces_a_workbook() {
        let resolved = resolved_with(vec![("Core i9", Category::Cpu, 589_990.0)]);
        let rows = build_export_rows(&resolved);

        let file = render_xlsx(&rows, resolved.total_price()).unwrap();
        assert_eq!(file.file_name, "mi-configuracion.xlsx");
        // XLSX containers start with the PK zip magic.
        assert_eq!(&file.bytes[..2], b"PK");
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(DownloadFormat::try_from("pdf").is_err());
    }
}
