//! Page flow: turns a render request into positioned text and rules.
//!
//! Coordinates are PDF user space (origin bottom-left, points). A body page
//! runs from `body_top` down to `body_bottom`; the running header sits above
//! that band and the page number below it.

use super::index::index_buckets;
use super::text::{fit_to_width, text_width, wrap, Face};
use super::{PageRole, PageSize, RenderRequest};
use crate::types::Policy;

const MARGIN: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgb(pub f32, pub f32, pub f32);

const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
// #C8102E
const RED: Rgb = Rgb(0.784, 0.063, 0.180);
// #003DA5
const BLUE: Rgb = Rgb(0.0, 0.239, 0.647);
// #666666
const GRAY: Rgb = Rgb(0.4, 0.4, 0.4);
// #CCCCCC
const LIGHT_GRAY: Rgb = Rgb(0.8, 0.8, 0.8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl From<PageSize> for PageGeometry {
    fn from(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        Self { width, height }
    }
}

impl PageGeometry {
    fn content_width(self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    fn body_top(self) -> f32 {
        self.height - 50.0
    }

    const fn body_bottom(self) -> f32 {
        50.0
    }

    fn header_baseline(self) -> f32 {
        self.height - 28.0
    }

    const fn footer_baseline(self) -> f32 {
        20.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mark {
    Text {
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rule {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ComposedPage {
    pub role: PageRole,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    face: Face,
    size: f32,
    leading: f32,
    color: Rgb,
}

const COVER_TITLE: Style = Style { face: Face::Bold, size: 24.0, leading: 36.0, color: RED };
const COVER_SUBTITLE: Style = Style { face: Face::Regular, size: 16.0, leading: 24.0, color: BLUE };
const COVER_META: Style = Style { face: Face::Regular, size: 10.0, leading: 15.0, color: GRAY };
const HEADING: Style = Style { face: Face::Bold, size: 18.0, leading: 27.0, color: RED };
const TOC_ENTRY: Style = Style { face: Face::Regular, size: 11.0, leading: 16.5, color: BLACK };
const SECTION_TITLE: Style = Style { face: Face::Bold, size: 16.0, leading: 24.0, color: BLUE };
const POLICY_TITLE: Style = Style { face: Face::Bold, size: 14.0, leading: 21.0, color: BLACK };
const POLICY_NUMBER: Style = Style { face: Face::Regular, size: 10.0, leading: 15.0, color: GRAY };
const CONTENT: Style = Style { face: Face::Regular, size: 11.0, leading: 17.6, color: BLACK };
const INDEX_LETTER: Style = Style { face: Face::Bold, size: 14.0, leading: 21.0, color: BLUE };
const INDEX_ENTRY: Style = Style { face: Face::Regular, size: 10.0, leading: 15.0, color: BLACK };
const HEADER: Style = Style { face: Face::Regular, size: 9.0, leading: 9.0, color: GRAY };
const FOOTER: Style = Style { face: Face::Regular, size: 10.0, leading: 10.0, color: GRAY };

/// Table of contents rows per page.
const TOC_ROWS_PER_PAGE: usize = 15;
/// Right-hand space reserved for TOC page numbers.
const TOC_NUMBER_COLUMN: f32 = 40.0;
const INDEX_INDENT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left(f32),
    Center,
}

#[derive(Debug, Clone)]
enum Row {
    Line {
        text: String,
        style: Style,
        align: Align,
        /// Right-aligned text on the same baseline.
        trailing: Option<String>,
    },
    Gap(f32),
}

impl Row {
    fn height(&self) -> f32 {
        match self {
            Self::Line { style, .. } => style.leading,
            Self::Gap(gap) => *gap,
        }
    }
}

fn block_height(rows: &[Row]) -> f32 {
    rows.iter().map(Row::height).sum()
}

/// Wrap every paragraph of `text` into left-aligned rows.
fn paragraph_rows(text: &str, style: Style, x: f32, max_width: f32) -> Vec<Row> {
    text.lines()
        .flat_map(|paragraph| wrap(paragraph, style.face, style.size, max_width))
        .map(|line| Row::Line {
            text: line,
            style,
            align: Align::Left(x),
            trailing: None,
        })
        .collect()
}

fn centered_rows(text: &str, style: Style, max_width: f32) -> Vec<Row> {
    wrap(text, style.face, style.size, max_width)
        .into_iter()
        .map(|line| Row::Line {
            text: line,
            style,
            align: Align::Center,
            trailing: None,
        })
        .collect()
}

struct Composer {
    geometry: PageGeometry,
    pages: Vec<ComposedPage>,
    cursor: f32,
}

impl Composer {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            cursor: geometry.body_top(),
        }
    }

    fn start_page(&mut self, role: PageRole) {
        self.pages.push(ComposedPage {
            role,
            marks: Vec::new(),
        });
        self.cursor = self.geometry.body_top();
    }

    fn current_role(&self) -> PageRole {
        self.pages.last().map_or(PageRole::Cover, |p| p.role)
    }

    fn at_top(&self) -> bool {
        (self.cursor - self.geometry.body_top()).abs() < f32::EPSILON
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.geometry.body_bottom()
    }

    fn continue_on_new_page(&mut self) {
        let role = self.current_role();
        self.start_page(role);
    }

    /// Place rows as a unit, moving to a fresh page of the same role when the
    /// block does not fit. Blocks taller than a whole page flow row by row.
    fn place_block(&mut self, rows: Vec<Row>) {
        if block_height(&rows) > self.remaining() && !self.at_top() {
            self.continue_on_new_page();
        }
        for row in rows {
            if let Row::Line { .. } = row {
                if row.height() > self.remaining() && !self.at_top() {
                    self.continue_on_new_page();
                }
            }
            self.place(row);
        }
    }

    fn place(&mut self, row: Row) {
        match row {
            Row::Gap(gap) => self.cursor -= gap,
            Row::Line {
                text,
                style,
                align,
                trailing,
            } => {
                let baseline = self.cursor - (style.leading - style.size) / 2.0 - style.size * 0.8;
                let geometry = self.geometry;
                if let Some(page) = self.pages.last_mut() {
                    if !text.is_empty() {
                        let x = match align {
                            Align::Left(x) => x,
                            Align::Center => {
                                (geometry.width - text_width(&text, style.face, style.size)) / 2.0
                            }
                        };
                        page.marks.push(text_mark(x, baseline, style, text));
                    }
                    if let Some(trailing) = trailing {
                        let x = geometry.width
                            - MARGIN
                            - text_width(&trailing, style.face, style.size);
                        page.marks.push(text_mark(x, baseline, style, trailing));
                    }
                }
                self.cursor -= style.leading;
            }
        }
    }
}

fn text_mark(x: f32, y: f32, style: Style, text: String) -> Mark {
    Mark::Text {
        x,
        y,
        face: style.face,
        size: style.size,
        color: style.color,
        text,
    }
}

/// Lay out the full manual.
pub(crate) fn compose(request: &RenderRequest<'_>, geometry: PageGeometry) -> Vec<ComposedPage> {
    let mut composer = Composer::new(geometry);

    compose_cover(&mut composer, request);
    if request.options.include_toc {
        compose_toc(&mut composer, request);
    }
    compose_body(&mut composer, request);
    if request.options.include_index {
        compose_index(&mut composer, request);
    }

    decorate(&mut composer.pages, request, geometry);
    composer.pages
}

fn compose_cover(composer: &mut Composer, request: &RenderRequest<'_>) {
    let metadata = request.metadata;
    let branding = &request.options.branding;
    let width = composer.geometry.content_width();

    let mut rows = centered_rows(&metadata.title, COVER_TITLE, width);
    rows.push(Row::Gap(20.0));
    rows.extend(centered_rows(&branding.organization, COVER_SUBTITLE, width));
    rows.push(Row::Gap(10.0));
    rows.extend(centered_rows(&branding.manual_kind, COVER_SUBTITLE, width));
    rows.push(Row::Gap(40.0));
    for line in [
        format!("Generated: {}", metadata.generated_at.format("%-m/%-d/%Y")),
        format!("Total Policies: {}", metadata.total_policies),
        format!("Sport: {}", metadata.sport),
    ] {
        rows.extend(centered_rows(&line, COVER_META, width));
        rows.push(Row::Gap(5.0));
    }

    composer.start_page(PageRole::Cover);
    // vertically centred inside the body band
    let band = composer.geometry.body_top() - composer.geometry.body_bottom();
    let offset = ((band - block_height(&rows)) / 2.0).max(0.0);
    composer.cursor -= offset;
    for row in rows {
        composer.place(row);
    }
}

fn compose_toc(composer: &mut Composer, request: &RenderRequest<'_>) {
    let width = composer.geometry.content_width();
    let entries: Vec<Row> = request
        .groups
        .iter()
        .map(|group| {
            let label = format!("{} ({})", group.category.label(), group.len());
            Row::Line {
                text: fit_to_width(&label, TOC_ENTRY.face, TOC_ENTRY.size, width - TOC_NUMBER_COLUMN),
                style: TOC_ENTRY,
                align: Align::Left(MARGIN),
                trailing: request
                    .estimate
                    .start_of(group.category)
                    .map(|page| page.to_string()),
            }
        })
        .collect();

    for (page_no, chunk) in entries.chunks(TOC_ROWS_PER_PAGE).enumerate() {
        composer.start_page(PageRole::Toc);
        if page_no == 0 {
            let mut title = centered_rows("Table of Contents", HEADING, width);
            title.push(Row::Gap(20.0));
            composer.place_block(title);
        }
        for entry in chunk {
            composer.place_block(vec![entry.clone(), Row::Gap(8.0)]);
        }
    }
}

fn compose_body(composer: &mut Composer, request: &RenderRequest<'_>) {
    let width = composer.geometry.content_width();

    for group in request.groups {
        composer.start_page(PageRole::Body(group.category));

        let mut heading = vec![Row::Gap(20.0)];
        heading.extend(paragraph_rows(&group.category.label(), SECTION_TITLE, MARGIN, width));
        heading.push(Row::Gap(10.0));
        composer.place_block(heading);

        for policy in &group.policies {
            composer.place_block(policy_rows(policy, width));
        }
    }
}

fn policy_rows(policy: &Policy, width: f32) -> Vec<Row> {
    let mut rows = paragraph_rows(&policy.title, POLICY_TITLE, MARGIN, width);
    rows.push(Row::Gap(5.0));
    rows.extend(paragraph_rows(
        &format!("Policy {}", policy.policy_number),
        POLICY_NUMBER,
        MARGIN,
        width,
    ));
    rows.push(Row::Gap(10.0));
    rows.extend(paragraph_rows(&policy.content_text, CONTENT, MARGIN, width));
    rows.push(Row::Gap(20.0));
    rows
}

fn compose_index(composer: &mut Composer, request: &RenderRequest<'_>) {
    let width = composer.geometry.content_width();
    let entry_width = width - INDEX_INDENT;

    composer.start_page(PageRole::Index);
    let mut title = centered_rows("Index", HEADING, width);
    title.push(Row::Gap(20.0));
    composer.place_block(title);

    let policies = request.groups.iter().flat_map(|g| g.policies.iter().copied());
    for bucket in index_buckets(policies) {
        let mut entries = bucket.policies.iter().map(|policy| {
            let mut rows = paragraph_rows(
                &format!("{} \u{2013} {}", policy.title, policy.policy_number),
                INDEX_ENTRY,
                MARGIN + INDEX_INDENT,
                entry_width,
            );
            rows.push(Row::Gap(5.0));
            rows
        });

        // the letter heading never ends a page on its own
        let mut heading = vec![Row::Gap(15.0)];
        heading.extend(paragraph_rows(&bucket.letter, INDEX_LETTER, MARGIN, width));
        heading.push(Row::Gap(10.0));
        if let Some(first) = entries.next() {
            heading.extend(first);
        }
        composer.place_block(heading);

        for rows in entries {
            composer.place_block(rows);
        }
    }
}

/// Running headers on body pages and page numbers on all but the cover.
fn decorate(pages: &mut [ComposedPage], request: &RenderRequest<'_>, geometry: PageGeometry) {
    for (i, page) in pages.iter_mut().enumerate() {
        if let PageRole::Body(category) = page.role {
            let header = format!("{} - {}", request.metadata.title, category.label());
            let header = fit_to_width(&header, HEADER.face, HEADER.size, geometry.content_width());
            let baseline = geometry.header_baseline();
            page.marks.push(text_mark(MARGIN, baseline, HEADER, header));
            page.marks.push(Mark::Rule {
                from: (MARGIN, baseline - 5.0),
                to: (geometry.width - MARGIN, baseline - 5.0),
                width: 0.5,
                color: LIGHT_GRAY,
            });
        }

        if page.role != PageRole::Cover {
            let number = (i + 1).to_string();
            let x = (geometry.width - text_width(&number, FOOTER.face, FOOTER.size)) / 2.0;
            page.marks
                .push(text_mark(x, geometry.footer_baseline(), FOOTER, number));
        }
    }
}
