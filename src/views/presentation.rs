//! Terminal renderers for the storefront and admin pages.
//!
//! Every renderer returns a `String`; printing is left to the console
//! commands.

use super::navigation::ImageCursor;
use crate::admin::ProductDraft;
use crate::models::Product;
use std::fmt::Write;

pub const STORE_NAME: &str = "Moodoo Studio";
pub const SLOGAN: &str = "May the light be with you";

/// Catalog grid state while the list is fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    Failed(String),
    Loaded(Vec<Product>),
}

/// Lira price with `.` thousands grouping and `,` decimals, e.g. `₺10.500`
/// or `₺99,9`. At most three fraction digits, trailing zeros dropped.
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let millis = (price.abs() * 1000.0).round() as u64;
    let whole = millis / 1000;
    let fraction = millis % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::from(if negative { "-₺" } else { "₺" });
    out.push_str(&grouped);
    if fraction > 0 {
        let decimals = format!("{:03}", fraction);
        out.push(',');
        out.push_str(decimals.trim_end_matches('0'));
    }
    out
}

pub fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "Out of stock".to_string()
    }
}

/// Cut to `max` characters, marking the cut with `…`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

pub fn render_hero() -> String {
    let width = 48;
    format!(
        "{rule}\n{name:^width$}\n{slogan:^width$}\n{rule}\n",
        rule = "━".repeat(width),
        name = STORE_NAME,
        slogan = SLOGAN,
        width = width
    )
}

pub fn render_catalog(view: &CatalogView) -> String {
    let products = match view {
        CatalogView::Loading => return "Loading products...\n".to_string(),
        CatalogView::Failed(message) => return format!("Failed to load products: {}\n", message),
        CatalogView::Loaded(products) => products,
    };
    if products.is_empty() {
        return "No products available yet.\n".to_string();
    }

    let mut out = String::from("LATEST COLLECTION\n\n");
    let _ = writeln!(
        out,
        "{:<4} {:<6} {:<32} {:>12}  {:<16}",
        "#", "ID", "TITLE", "PRICE", "SIZE"
    );
    let _ = writeln!(out, "{}", "─".repeat(76));
    for (i, p) in products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<6} {:<32} {:>12}  {:<16}",
            i + 1,
            p.id,
            truncate(&p.title, 30),
            format_price(p.price),
            truncate(p.dimensions.as_deref().unwrap_or("-"), 16),
        );
        let _ = writeln!(out, "{:<11} {}", "", p.cover_image().unwrap_or("(no image)"));
    }
    out
}

pub fn render_detail(product: &Product, cursor: &ImageCursor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.title);
    let _ = writeln!(out, "{}", format_price(product.price));
    let _ = writeln!(out, "{}", "─".repeat(48));

    if let Some(description) = &product.description {
        let _ = writeln!(out, "{}\n", description);
    }
    if let Some(dimensions) = &product.dimensions {
        let _ = writeln!(out, "{:<12}{}", "Size", dimensions);
    }
    if let Some(materials) = &product.materials {
        let _ = writeln!(out, "{:<12}{}", "Materials", materials);
    }
    let _ = writeln!(out, "{:<12}{}", "Stock", stock_label(product));

    if product.cover_image().is_none() {
        let _ = writeln!(out, "\nNo images");
    } else {
        let _ = writeln!(
            out,
            "\nImages ({}/{})",
            cursor.index() + 1,
            product.images.len()
        );
        for (i, url) in product.images.iter().enumerate() {
            let marker = if i == cursor.index() { '>' } else { ' ' };
            let _ = writeln!(out, "{} {}. {}", marker, i + 1, url);
        }
    }

    let _ = writeln!(out, "\nBuy: {}", product.shopier_url);
    let _ = writeln!(out, "You will be redirected to Shopier for secure payment.");
    out
}

pub fn render_admin_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products added yet.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<6} {:<28} {:>12}  {:<14} {:<6} {:<9} {:<6}",
        "POS", "ID", "TITLE", "PRICE", "SIZE", "STOCK", "FEATURED", "IMAGES"
    );
    let _ = writeln!(out, "{}", "─".repeat(94));
    for (i, p) in products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<6} {:<28} {:>12}  {:<14} {:<6} {:<9} {:<6}",
            i + 1,
            p.id,
            truncate(&p.title, 26),
            format_price(p.price),
            truncate(p.dimensions.as_deref().unwrap_or("-"), 14),
            p.stock,
            if p.is_featured { "yes" } else { "no" },
            p.images.len(),
        );
    }
    out
}

/// Summary of the create/edit form before it is saved.
pub fn render_draft(draft: &ProductDraft) -> String {
    let form = &draft.form;
    let mut out = String::new();
    let heading = match draft.editing() {
        Some(product) => format!("Edit product #{}", product.id),
        None => "New product".to_string(),
    };
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", "─".repeat(48));
    let rows = [
        ("Title", form.title.as_str()),
        ("Price", form.price.as_str()),
        ("Checkout", form.shopier_url.as_str()),
        ("Size", form.dimensions.as_str()),
        ("Materials", form.materials.as_str()),
        ("Stock", form.stock.as_str()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<12}{}", label, if value.is_empty() { "-" } else { value });
    }
    let _ = writeln!(out, "{:<12}{}", "Featured", if form.is_featured { "yes" } else { "no" });
    let _ = writeln!(
        out,
        "{:<12}{} kept, {} new, {} removed",
        "Images",
        draft.existing_images().len(),
        draft.new_images().len(),
        draft.removed_images().len()
    );
    out
}
