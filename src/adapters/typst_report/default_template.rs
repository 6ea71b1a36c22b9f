//! Built-in Typst report markup with `{{PLACEHOLDER}}` substitution.

const DEFAULT_TEMPLATE: &str = r#"#set page(paper: "a4", margin: 2cm)
#set text(font: "Linux Libertine", size: 10pt)

#align(center)[
  #text(size: 20pt, weight: "bold")[{{TITLE}}]
]

{{ANALYSIS_SUMMARY}}

= Price Chart

{{PRICE_CHART_SVG}}

= Big Moves Table

{{MOVES_TABLE}}

= Statistics

{{STATISTICS_TABLE}}

{{HISTOGRAM_SVG}}
"#;

pub fn template() -> &'static str {
    DEFAULT_TEMPLATE
}

pub const PLACEHOLDERS: [&str; 6] = [
    "{{TITLE}}",
    "{{ANALYSIS_SUMMARY}}",
    "{{PRICE_CHART_SVG}}",
    "{{MOVES_TABLE}}",
    "{{STATISTICS_TABLE}}",
    "{{HISTOGRAM_SVG}}",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_uses_every_placeholder() {
        for p in PLACEHOLDERS {
            assert!(template().contains(p), "missing {p}");
        }
    }

    #[test]
    fn default_template_has_three_sections() {
        assert!(template().contains("= Price Chart"));
        assert!(template().contains("= Big Moves Table"));
        assert!(template().contains("= Statistics"));
    }
}
