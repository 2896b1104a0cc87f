//! Plymouth theme descriptor (`<name>.plymouth`) and animation script (`<name>.script`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{config::ThemeConfig, error::PlymgenResult};

pub fn render_descriptor(cfg: &ThemeConfig) -> String {
    let install_dir = cfg.install_dir();
    format!(
        "[Plymouth Theme]\n\
         Name={name}\n\
         Description={description}\n\
         ModuleName=script\n\
         \n\
         [script]\n\
         ImageDir={install_dir}\n\
         ScriptFile={install_dir}/{script}\n",
        name = cfg.name,
        description = cfg.description,
        script = cfg.script_file_name(),
    )
}

/// Script loading `frame_count` frames into one sprite centred on the screen.
pub fn render_script(frame_count: u64) -> String {
    format!(
        "for (i = 0; i < {frame_count}; i++)\n   \
         animation_image[i] = Image(\"animation_frame_\" + i + \".png\");\n\
         animation_sprite = Sprite();\n\
         \n\
         animation_sprite.SetX(Window.GetWidth() / 2 - animation_image[0].GetWidth() / 2);\n\
         animation_sprite.SetY(Window.GetHeight() / 2 - animation_image[0].GetHeight() / 2);\n"
    )
}

pub fn write_descriptor(cfg: &ThemeConfig) -> PlymgenResult<PathBuf> {
    let path = cfg.build_file(&cfg.descriptor_file_name());
    write_whole(&path, &render_descriptor(cfg))?;
    tracing::info!("Plymouth theme file '{}' created/updated", path.display());
    Ok(path)
}

pub fn write_script(cfg: &ThemeConfig, frame_count: u64) -> PlymgenResult<PathBuf> {
    let path = cfg.build_file(&cfg.script_file_name());
    write_whole(&path, &render_script(frame_count))?;
    tracing::info!("Plymouth script file '{}' created/updated", path.display());
    Ok(path)
}

fn write_whole(path: &Path, contents: &str) -> PlymgenResult<()> {
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_matches_plymouth_layout() {
        let cfg = ThemeConfig {
            name: "foo".to_string(),
            ..ThemeConfig::default()
        };
        assert_eq!(
            render_descriptor(&cfg),
            "[Plymouth Theme]\n\
             Name=foo\n\
             Description=A custom theme for Plymouth\n\
             ModuleName=script\n\
             \n\
             [script]\n\
             ImageDir=/usr/share/plymouth/themes/foo\n\
             ScriptFile=/usr/share/plymouth/themes/foo/foo.script\n"
        );
    }

    #[test]
    fn script_loop_uses_frame_count() {
        let script = render_script(250);
        let mut lines = script.lines();
        assert_eq!(lines.next(), Some("for (i = 0; i < 250; i++)"));
        assert_eq!(
            lines.next(),
            Some("   animation_image[i] = Image(\"animation_frame_\" + i + \".png\");")
        );
        assert_eq!(lines.next(), Some("animation_sprite = Sprite();"));
        assert_eq!(lines.next(), Some(""));
        assert!(lines.next().unwrap().starts_with("animation_sprite.SetX(Window.GetWidth() / 2"));
        assert!(lines.next().unwrap().starts_with("animation_sprite.SetY(Window.GetHeight() / 2"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn writes_replace_previous_contents() {
        let root = std::env::temp_dir().join(format!(
            "plymgen_theme_write_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).unwrap();
        let cfg = ThemeConfig {
            build: root.to_string_lossy().into_owned(),
            ..ThemeConfig::default()
        };

        let script = cfg.build_file("custom.script");
        std::fs::write(&script, "stale contents that are much longer than the new ones".repeat(20))
            .unwrap();
        assert_eq!(write_script(&cfg, 3).unwrap(), script);
        assert_eq!(std::fs::read_to_string(&script).unwrap(), render_script(3));

        let descriptor = write_descriptor(&cfg).unwrap();
        assert_eq!(descriptor, cfg.build_file("custom.plymouth"));
        assert_eq!(
            std::fs::read_to_string(&descriptor).unwrap(),
            render_descriptor(&cfg)
        );
        std::fs::remove_dir_all(&root).ok();
    }
}
