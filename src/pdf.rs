use crate::models::{DeckRecord, StrategyReport};
use printpdf::*;
use std::io::BufWriter;

// Landscape A4, matching the 16:9 slide orientation.
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;

/// Text-only deck export: summary page, one page per slide, then the strategy report.
pub fn generate_pdf(record: &DeckRecord) -> Result<Vec<u8>, String> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Pitch Deck: {}", truncate(&record.label, 48)),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| e.to_string())?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| e.to_string())?;

    let summary = doc.get_page(page).get_layer(layer);
    summary.use_text("Pitch Deck", 24.0, Mm(15.0), Mm(190.0), &bold);
    summary.use_text(truncate(&record.label, 140), 12.0, Mm(15.0), Mm(178.0), &font);
    summary.use_text(format!("Style: {}", record.style.name), 10.0, Mm(15.0), Mm(168.0), &font);
    summary.use_text(format!("Generated: {}", record.created_at.format("%Y-%m-%d %H:%M UTC")), 10.0, Mm(15.0), Mm(160.0), &font);
    if let Some(strategy) = &record.deck.strategy {
        let mut y = 145.0;
        for line in wrap(&strategy.summary, 110).into_iter().take(12) {
            summary.use_text(line, 10.0, Mm(15.0), Mm(y), &font);
            y -= 6.0;
        }
    }
    summary.use_text("(Slide images not embedded in PDF export)", 8.0, Mm(15.0), Mm(12.0), &font);

    for (i, (slide, spec)) in record.deck.results.iter().zip(&record.deck.raw_slides).enumerate() {
        let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), format!("Slide {}", i + 1));
        let layer_ref = doc.get_page(page).get_layer(layer);
        layer_ref.use_text(format!("{}. {}", i + 1, spec.title), 20.0, Mm(15.0), Mm(190.0), &bold);
        let mut y = 175.0;
        for line in wrap(&spec.body, 100) {
            layer_ref.use_text(line, 12.0, Mm(15.0), Mm(y), &font);
            y -= 7.0;
        }
        let status = match (&slide.image_url, &slide.text) {
            (Some(_), _) => "Image: generated".to_string(),
            (None, Some(reason)) => format!("Image unavailable: {}", truncate(reason, 120)),
            (None, None) => "Image unavailable".to_string(),
        };
        layer_ref.use_text(status, 9.0, Mm(15.0), Mm(20.0), &font);
    }

    if let Some(strategy) = &record.deck.strategy {
        let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Strategy");
        let layer_ref = doc.get_page(page).get_layer(layer);
        layer_ref.use_text("Strategy Report", 20.0, Mm(15.0), Mm(190.0), &bold);
        let mut y = 178.0;
        for (heading, lines) in strategy_sections(strategy) {
            if y < 20.0 { break; }
            layer_ref.use_text(heading, 11.0, Mm(15.0), Mm(y), &bold);
            y -= 6.0;
            for line in lines {
                if y < 20.0 { break; }
                layer_ref.use_text(truncate(&line, 150), 9.0, Mm(20.0), Mm(y), &font);
                y -= 5.0;
            }
        }
    }

    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buf);
        doc.save(&mut writer).map_err(|e| e.to_string())?;
    }
    Ok(buf)
}

fn strategy_sections(strategy: &StrategyReport) -> Vec<(&'static str, Vec<String>)> {
    let bullets = |items: &[String]| items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>();
    vec![
        ("Market Strategy", wrap(&strategy.market_strategy, 140)),
        ("Strengths", bullets(&strategy.swot.strengths)),
        ("Weaknesses", bullets(&strategy.swot.weaknesses)),
        ("Opportunities", bullets(&strategy.swot.opportunities)),
        ("Threats", bullets(&strategy.swot.threats)),
        ("Immediate", bullets(&strategy.action_plan.immediate)),
        ("Mid-term", bullets(&strategy.action_plan.mid_term)),
        ("Long-term", bullets(&strategy.action_plan.long_term)),
    ]
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() { current.push(' '); }
        current.push_str(word);
    }
    if !current.is_empty() { lines.push(current); }
    lines
}
