use crate::models::{AppMode, PreviewColors, PresetTemplate, StyleDescriptor, TemplateCategory};

// id, name, description, prompt modifier, [bg, text, accent, secondary]
const STYLES: [(&str, &str, &str, &str, [&str; 4]); 5] = [
    (
        "swiss-minimal",
        "Swiss Minimalist",
        "Clean, grid-based, bold typography, high contrast.",
        "in a Swiss International Style. Use a strict grid layout, lots of white space, and bold, black sans-serif typography (Helvetica style). Keep colors to black, white, and one bold accent color like red or blue. The look should be corporate but ultra-modern and clean.",
        ["#ffffff", "#000000", "#dc2626", "#f3f4f6"],
    ),
    (
        "tech-noir",
        "Tech Noir",
        "Dark mode, neon gradients, futuristic.",
        "in a dark futuristic \"Tech Noir\" style. Use a deep charcoal or black background with glowing neon gradients (cyan and magenta). Use sleek, thin monospaced fonts. Include abstract data visualization elements and grid lines in the background.",
        ["#0f172a", "#e2e8f0", "#06b6d4", "#1e293b"],
    ),
    (
        "eco-modern",
        "Eco Modern",
        "Natural tones, soft shapes, organic feel.",
        "in an \"Eco Modern\" style. Use a palette of sage greens, creams, and earth tones. Use rounded, soft shapes and organic textures (like paper or stone). The typography should be elegant serif or soft sans-serif. It should feel sustainable and premium.",
        ["#f0fdf4", "#14532d", "#86efac", "#dcfce7"],
    ),
    (
        "bold-pop",
        "Bold Pop",
        "Vibrant colors, high energy, playful.",
        "in a \"Bold Pop\" style. Use clashing, vibrant colors like yellow, pink, and electric blue. Use heavy, chunky fonts and collage-style elements. The layout should be energetic and dynamic, perfect for a B2C consumer brand.",
        ["#fef08a", "#000000", "#ec4899", "#3b82f6"],
    ),
    (
        "corporate-blue",
        "Trusted Corporate",
        "Professional, trustworthy, classic blue.",
        "in a classic \"Trusted Corporate\" style. Use a palette of navy blue, white, and grey. The layout should be traditional and structured. Use clean, professional sans-serif fonts. Include subtle geometric patterns in the background.",
        ["#ffffff", "#1e3a8a", "#2563eb", "#eff6ff"],
    ),
];

pub fn deck_styles() -> Vec<StyleDescriptor> {
    STYLES.iter().map(|(id, name, description, modifier, [bg, text, accent, secondary])| StyleDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        prompt_modifier: modifier.to_string(),
        preview_colors: PreviewColors {
            bg: bg.to_string(),
            text: text.to_string(),
            accent: accent.to_string(),
            secondary: secondary.to_string(),
        },
    }).collect()
}

pub fn find_style(id: &str) -> Option<StyleDescriptor> {
    deck_styles().into_iter().find(|s| s.id == id)
}

fn template(id: &str, name: &str, description: &str, category: TemplateCategory, mode: AppMode, prompt: &str) -> PresetTemplate {
    PresetTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        prompt: prompt.to_string(),
        category,
        mode,
        recommended_ratio: None,
    }
}

pub fn prompt_templates() -> Vec<PresetTemplate> {
    use AppMode::{Generate, Transform};
    use TemplateCategory::*;
    vec![
        template("1", "Instagram Summer Sale", "Bright, vibrant summer themed sale post", Social, Transform,
            "Transform this image into a vibrant Instagram summer sale post. Add \"SUMMER SALE\" text overlay in a bold, fun font. Add tropical leaves and bright yellow accents in the background."),
        template("2", "Luxury Product Background", "Minimalist marble podium for e-commerce", Ecommerce, Transform,
            "Place this product on a sleek white marble podium. Use soft, high-key lighting to make it look expensive and luxurious. Remove the original background and replace it with a clean, blurred studio background."),
        template("3", "Cyberpunk Flyer", "Neon lights and futuristic city vibes", Creative, Transform,
            "Edit this image to have a cyberpunk aesthetic. Add neon blue and pink lighting effects. Place the subject in a futuristic city street at night with glowing signs."),
        template("4", "Cozy Lifestyle", "Warm, homey atmosphere for products", Lifestyle, Transform,
            "Place this object in a cozy living room setting with soft warm lighting, a wooden table surface, and a blurred fireplace in the background. Make it look like a comfortable home lifestyle shot."),
        template("5", "Professional Headshot Polish", "Clean background and lighting fix", Creative, Transform,
            "Keep the person exactly as is but improve the lighting to be studio quality. Change the background to a professional blurred office setting."),
        template("6", "Flash Sale Banner", "Urgent red and white promotional banner", Social, Transform,
            "Turn this into a horizontal flash sale web banner. Use a red and white color scheme. Add \"FLASH SALE - 50% OFF\" text clearly visible next to the subject."),
        template("7", "Grand Opening Flyer", "Professional flyer for a cafe opening", Social, Generate,
            "Create a stylish flyer for a \"Grand Opening\" of a modern coffee shop. Use warm, inviting colors with an illustration of a latte art coffee cup. Add the text \"GRAND OPENING\" in elegant typography."),
        template("8", "Tech Conference Banner", "Futuristic banner for tech event", Creative, Generate,
            "Design a wide web banner for a \"Future Tech 2025\" conference. Use a deep blue and purple gradient background with abstract digital circuit patterns. Include the text \"FUTURE TECH 2025\" in a sleek, modern font."),
        template("9", "Summer Music Festival", "Vibrant concert poster design", Creative, Generate,
            "Generate a vibrant poster for a summer music festival. Use bright sunset colors (orange, pink, purple) and silhouette illustrations of a crowd and palm trees. Add text \"SUMMER VIBES FEST\" in a large, distressed font."),
        template("10", "Minimalist Skincare Ad", "Clean, pastel product advertisement", Ecommerce, Generate,
            "Create a clean, minimalist advertisement background for skincare. Use soft pastel green and white tones. Include organic shapes like leaves and water ripples. Leave a central space for product placement."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn style_ids_are_unique_and_resolvable() {
        let styles = deck_styles();
        let ids: HashSet<_> = styles.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), styles.len());
        assert_eq!(find_style("eco-modern").map(|s| s.name), Some("Eco Modern".to_string()));
        assert!(find_style("glass-light").is_none());
    }

    #[test]
    fn templates_cover_both_modes() {
        let templates = prompt_templates();
        assert_eq!(templates.len(), 10);
        assert_eq!(templates.iter().filter(|t| t.mode == AppMode::Transform).count(), 6);
        assert!(templates.iter().all(|t| t.mode != AppMode::Deck));
    }
}
