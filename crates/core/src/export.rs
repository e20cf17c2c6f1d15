use crate::page::Page;
use crate::render::Chart;

pub fn to_csv(chart: &Chart, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["name", "category", "group", "value", "x0", "y0", "x1", "y1", "fill"])?;
    for t in &chart.tiles {
        writer.write_record([
            t.name.clone(),
            t.category.clone(),
            t.group.clone(),
            t.value.to_string(),
            t.rect.x0.to_string(),
            t.rect.y0.to_string(),
            t.rect.x1.to_string(),
            t.rect.y1.to_string(),
            t.fill.to_hex(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(page: &Page) -> serde_json::Value {
    serde_json::json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "dataset": page.dataset.key,
        "title": page.title,
        "description": page.description,
        "body": page.body,
    })
}

/// One A4 landscape page: title, then every tile scaled to fit.
pub fn to_pdf(page: &Page, out: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    use printpdf::*;

    const PAGE_W: f32 = 297.0;
    const PAGE_H: f32 = 210.0;
    const MARGIN: f32 = 12.0;

    let (doc, page1, layer1) = PdfDocument::new(page.title.as_str(), Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    layer.use_text(page.title.as_str(), 14.0, Mm(MARGIN), Mm(PAGE_H - MARGIN), &font);
    layer.use_text(page.description.as_str(), 9.0, Mm(MARGIN), Mm(PAGE_H - MARGIN - 6.0), &font);

    match page.chart() {
        Some(chart) => draw_tiles(&layer, chart, MARGIN, PAGE_W - 2.0 * MARGIN, PAGE_H - 2.0 * MARGIN - 12.0),
        None => {
            let message = page.failure().unwrap_or(crate::page::LOAD_FAILURE_MESSAGE);
            layer.use_text(message, 11.0, Mm(MARGIN), Mm(PAGE_H / 2.0), &font);
        }
    }

    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf)?;
    std::io::Write::flush(&mut buf)?;
    Ok(())
}

fn draw_tiles(layer: &printpdf::PdfLayerReference, chart: &Chart, margin: f32, avail_w: f32, avail_h: f32) {
    use printpdf::*;

    let scale = (avail_w / chart.width as f32).min(avail_h / chart.height as f32);
    // PDF origin is bottom-left; chart origin is top-left.
    let top = margin + chart.height as f32 * scale;
    for t in &chart.tiles {
        let c = t.fill;
        layer.set_fill_color(Color::Rgb(Rgb::new(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0, None)));
        let llx = margin + t.rect.x0 as f32 * scale;
        let lly = top - t.rect.y1 as f32 * scale;
        let urx = margin + t.rect.x1 as f32 * scale;
        let ury = top - t.rect.y0 as f32 * scale;
        layer.add_rect(printpdf::Rect::new(Mm(llx), Mm(lly), Mm(urx), Mm(ury)));
    }
}
