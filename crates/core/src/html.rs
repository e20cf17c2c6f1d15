use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::page::{ChartBody, Page, LOAD_FAILURE_MESSAGE};
use crate::render::Chart;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; text-align: center; margin: 0; padding: 1rem; }
#title { margin-bottom: 0.25rem; }
#description { margin-top: 0; color: #444; }
#tree-map { display: block; margin: 0 auto; }
#legend { display: block; margin: 0 auto 20px; }
.tile:hover { opacity: 0.85; }
.tooltip { position: absolute; visibility: hidden; pointer-events: none; background: rgba(255, 255, 255, 0.95); border: 1px solid #999; border-radius: 4px; padding: 4px 8px; font-size: 12px; text-align: left; }
.tooltip p { margin: 2px 0; }
"#;

const SCRIPT: &str = r#"
(function () {
  var tip = document.getElementById('tooltip');
  document.querySelectorAll('#tree-map .tile').forEach(function (tile) {
    tile.addEventListener('mouseover', function (event) {
      var d = tile.dataset;
      tip.innerHTML = '';
      [['Name', d.name], ['Category', d.category], ['Value', d.value]].forEach(function (kv) {
        var p = document.createElement('p');
        p.textContent = kv[0] + ': ' + kv[1];
        tip.appendChild(p);
      });
      tip.setAttribute('data-value', d.value);
      tip.style.top = event.pageY + 'px';
      tip.style.left = event.pageX + 'px';
      tip.style.visibility = 'visible';
    });
    tile.addEventListener('mouseout', function () {
      tip.style.visibility = 'hidden';
    });
  });
})();
"#;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn chart_svg(chart: &Chart) -> String {
    let mut s = String::with_capacity(chart.tiles.len() * 256);
    for tile in &chart.tiles {
        let r = &tile.rect;
        let _ = write!(
            s,
            r#"<g transform="translate({},{})"><rect class="tile" data-name="{}" data-category="{}" data-value="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            r.x0,
            r.y0,
            escape(&tile.name),
            escape(&tile.category),
            tile.value,
            r.width(),
            r.height(),
            tile.fill,
            tile.stroke,
            tile.stroke_width,
        );
        s.push_str(r#"<text class="label">"#);
        for line in &tile.label {
            let _ = write!(
                s,
                r#"<tspan x="{}" y="{}" font-size="{}px" fill="{}">{}</tspan>"#,
                line.x,
                line.y,
                chart.label_font_size,
                chart.label_fill,
                escape(&line.text)
            );
        }
        s.push_str("</text></g>\n");
    }
    s
}

pub fn legend_svg(chart: &Chart) -> String {
    let legend = &chart.legend;
    let mut s = String::new();
    let _ = write!(s, r#"<g transform="translate({},0)">"#, legend.offset_x);
    for item in &legend.items {
        let _ = write!(
            s,
            r#"<g transform="translate({},{})"><rect class="legend-item" width="{sw}" height="{sw}" fill="{}"/><text x="{}" y="{}" dy="0.35em" font-size="{}px">{}</text></g>"#,
            item.x,
            item.y,
            item.color,
            legend.swatch + legend.text_gap,
            legend.swatch / 2.0,
            legend.font_size,
            escape(&item.category),
            sw = legend.swatch,
        );
    }
    s.push_str("</g>");
    s
}

fn failure_svg(message: &str) -> String {
    format!(r#"<text x="50%" y="50%" text-anchor="middle">{}</text>"#, escape(message))
}

/// Write a self-contained page: header, chart, legend, tooltip.
pub fn write_page<W: Write>(w: &mut W, page: &Page, width: f64, height: f64) -> io::Result<()> {
    let (chart, legend_height, legend) = match &page.body {
        ChartBody::Ready(chart) => (chart_svg(chart), chart.legend.height, legend_svg(chart)),
        ChartBody::Failed { message } => (failure_svg(message), 0.0, String::new()),
        ChartBody::Pending => (String::new(), 0.0, String::new()),
    };
    write!(
        w,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1 id="title">{title}</h1>
<p id="description">{description}</p>
<svg id="tree-map" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
{chart}</svg>
<svg id="legend" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{legend_height}">{legend}</svg>
<div class="tooltip" id="tooltip"></div>
<script>{SCRIPT}</script>
</body>
</html>
"#,
        title = escape(&page.title),
        description = escape(&page.description),
    )
}

/// The chart alone as an SVG document.
pub fn write_svg<W: Write>(w: &mut W, page: &Page, width: f64, height: f64) -> io::Result<()> {
    let body = match &page.body {
        ChartBody::Ready(chart) => chart_svg(chart),
        ChartBody::Failed { message } => failure_svg(message),
        ChartBody::Pending => failure_svg(LOAD_FAILURE_MESSAGE),
    };
    writeln!(
        w,
        r#"<svg id="tree-map" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif">
<title>{}</title>
{body}</svg>"#,
        escape(&page.title)
    )
}

pub fn save_page(path: &Path, page: &Page, width: f64, height: f64) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_page(&mut out, page, width, height)?;
    out.flush()
}

pub fn save_svg(path: &Path, page: &Page, width: f64, height: f64) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_svg(&mut out, page, width, height)?;
    out.flush()
}
