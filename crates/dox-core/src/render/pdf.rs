//! PDF serialization of composed pages with `lopdf`.
//!
//! Output is uncompressed and carries no random ids, so identical input
//! yields identical bytes.

use super::compose::{ComposedPage, Mark, PageGeometry, Rgb};
use super::text::{encode_win_ansi, Face};
use crate::error::{DoxError, Result};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

/// Values written to the document information dictionary.
pub(crate) struct DocumentInfo<'a> {
    pub title: &'a str,
    pub subject: &'a str,
    pub producer: &'a str,
    pub created: DateTime<Utc>,
}

pub(crate) fn write_pdf(
    pages: &[ComposedPage],
    geometry: PageGeometry,
    info: &DocumentInfo<'_>,
) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font(Face::Regular));
    let bold_id = doc.add_object(font(Face::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Face::Regular.resource_name() => regular_id,
            Face::Bold.resource_name() => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .map_err(|e| DoxError::Render(format!("Failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len())
        .map_err(|_| DoxError::Render("Page count out of range".to_string()))?;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.width),
                Object::Real(geometry.height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(info_dictionary(info));
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| DoxError::Render(format!("Failed to write PDF: {e}")))?;
    Ok(buffer)
}

fn font(face: Face) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn info_dictionary(info: &DocumentInfo<'_>) -> Dictionary {
    dictionary! {
        "Title" => literal(info.title),
        "Subject" => literal(info.subject),
        "Producer" => literal(info.producer),
        "CreationDate" => Object::string_literal(info.created.format("D:%Y%m%d%H%M%SZ").to_string()),
    }
}

fn literal(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

/// Two decimals keeps the content streams short and stable.
fn real(value: f32) -> Object {
    Object::Real((value * 100.0).round() / 100.0)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![real(color.0), real(color.1), real(color.2)]
}

fn page_operations(page: &ComposedPage) -> Vec<Operation> {
    let mut ops = Vec::new();
    for mark in &page.marks {
        match mark {
            Mark::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(face.resource_name().as_bytes().to_vec()), real(*size)],
                ));
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new("Td", vec![real(*x), real(*y)]));
                ops.push(Operation::new("Tj", vec![literal(text)]));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Rule {
                from,
                to,
                width,
                color,
            } => {
                ops.push(Operation::new("w", vec![real(*width)]));
                ops.push(Operation::new("RG", color_operands(*color)));
                ops.push(Operation::new("m", vec![real(from.0), real(from.1)]));
                ops.push(Operation::new("l", vec![real(to.0), real(to.1)]));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}
