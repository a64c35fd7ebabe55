use std::{borrow::Cow, io::Write};

use crate::error::Error;

use super::AtlasDescription;

pub(super) fn render<W: Write>(atlas: &AtlasDescription, mut output: W) -> Result<(), Error> {
    write!(
        output,
        "<TextureAtlas imagePath=\"{}\">",
        escape_xml(&atlas.image)
    )?;

    for sprite in &atlas.sprites {
        write!(
            output,
            "\n    <SubTexture name=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
            escape_xml(&sprite.name),
            sprite.left,
            sprite.top,
            sprite.width,
            sprite.height
        )?;
    }

    writeln!(output, "\n</TextureAtlas>")?;
    Ok(())
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(|c: char| matches!(c, '&' | '<' | '>' | '"')) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }

    Cow::Owned(escaped)
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::descriptor::sample_description;

    fn render_to_string(atlas: &AtlasDescription) -> String {
        let mut output = Vec::new();
        render(atlas, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn texture_atlas() {
        insta::assert_snapshot!(render_to_string(&sample_description()), @r###"
        <TextureAtlas imagePath="atlas-1.png">
            <SubTexture name="character_hero" x="2" y="2" width="256" height="252"/>
            <SubTexture name="button" x="260" y="2" width="200" height="80"/>
        </TextureAtlas>
        "###);
    }

    #[test]
    fn exact_bytes() {
        let mut atlas = sample_description();
        atlas.sprites.truncate(1);

        assert_eq!(
            render_to_string(&atlas),
            "<TextureAtlas imagePath=\"atlas-1.png\">\n    <SubTexture name=\"character_hero\" x=\"2\" y=\"2\" width=\"256\" height=\"252\"/>\n</TextureAtlas>\n"
        );
    }

    #[test]
    fn empty_atlas() {
        let mut atlas = sample_description();
        atlas.sprites.clear();

        assert_eq!(
            render_to_string(&atlas),
            "<TextureAtlas imagePath=\"atlas-1.png\">\n</TextureAtlas>\n"
        );
    }

    #[test]
    fn escapes_attributes() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml(r#"a<b>&"c""#),
            "a&lt;b&gt;&amp;&quot;c&quot;"
        );
    }
}
