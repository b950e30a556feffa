//! EPUB packager.
//!
//! Writes an EPUB 2 container: one XHTML document per page, an NCX table of
//! contents mirroring the page tree, and a shared stylesheet.

use std::fmt::Write as _;
use std::io::{Seek, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{Metadata, Packager};
use crate::book::{PageTree, TreeNode, Uid};
use crate::error::Result;
use crate::util::{escape_xml, uuid_v4};

/// Styles for the classes the page transformer and credits emit.
pub const DEFAULT_STYLESHEET: &str = r#"body { font-family: serif; margin: 0 5%; }
p { margin: 0.5em 0; text-indent: 0; }
.title { font-size: 1.6em; font-weight: bold; text-align: center; margin: 1em 0; }
.title2 { font-size: 2em; font-weight: bold; text-align: center; margin-top: 30%; }
.tabview { border-top: 1px solid #999; margin: 1em 0; }
.tabview-tab { margin: 0.5em 0; }
.tab-title { font-weight: bold; border-bottom: 1px solid #999; }
.collapsible { border-left: 2px solid #999; padding-left: 0.8em; margin: 1em 0; }
.collapsible-title { font-style: italic; }
.quote { border: 1px dashed #999; background: #f4f4f4; padding: 0 1em; margin: 1em 2em; }
.link { text-decoration: underline; }
.footnote { font-size: 0.85em; }
.attrib p { margin: 0.8em 0; }
"#;

/// Configuration for EPUB packaging.
#[derive(Debug, Clone, Default)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// Replacement for [`DEFAULT_STYLESHEET`].
    pub stylesheet: Option<String>,
}

/// EPUB format packager.
///
/// Pages become `OEBPS/<uid>.xhtml`, in document order in the spine.
pub struct EpubPackager {
    metadata: Metadata,
    config: EpubConfig,
}

impl EpubPackager {
    /// Create a new packager with default configuration.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            config: EpubConfig::default(),
        }
    }

    /// Configure the packager with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Write the book to any [`Write`] + [`Seek`] destination.
    ///
    /// Useful for writing to memory buffers.
    pub fn write_to<W: Write + Seek>(&self, tree: &PageTree, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let compression_level = self.config.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));

        // 1. Write mimetype (must be first, uncompressed)
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        // 2. Write container.xml
        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        // Generate identifier once for consistency between OPF and NCX
        let identifier = if self.metadata.identifier.is_empty() {
            format!("urn:uuid:{}", uuid_v4())
        } else {
            self.metadata.identifier.clone()
        };
        let order = tree.flatten();

        // 3. Write content.opf
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(generate_opf(&self.metadata, &identifier, &order).as_bytes())?;

        // 4. Write toc.ncx
        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(generate_ncx(&self.metadata, &identifier, tree).as_bytes())?;

        // 5. Write stylesheet
        let css = self
            .config
            .stylesheet
            .as_deref()
            .unwrap_or(DEFAULT_STYLESHEET);
        zip.start_file("OEBPS/stylesheet.css", deflated)?;
        zip.write_all(css.as_bytes())?;

        // 6. Write pages
        for node in order.iter().filter_map(|&uid| tree.node(uid)) {
            zip.start_file(format!("OEBPS/{}.xhtml", node.uid), deflated)?;
            zip.write_all(page_document(node).as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}

impl Packager for EpubPackager {
    fn package(&self, tree: &PageTree, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(tree, file)
    }
}

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn manifest_id(uid: Uid) -> String {
    format!("page_{uid}")
}

/// Wrap a page body in a complete XHTML document.
fn page_document(node: &TreeNode) -> String {
    let mut doc = String::new();
    doc.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <meta http-equiv="Content-Type" content="application/xhtml+xml; charset=utf-8"/>
  <title>"#,
    );
    doc.push_str(&escape_xml(&node.title));
    doc.push_str("</title>\n");
    doc.push_str("  <link rel=\"stylesheet\" type=\"text/css\" href=\"stylesheet.css\"/>\n");
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&node.content);
    doc.push_str("\n</body>\n</html>\n");
    doc
}

fn generate_opf(metadata: &Metadata, identifier: &str, order: &[Uid]) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );

    let _ = writeln!(opf, "    <dc:title>{}</dc:title>", escape_xml(&metadata.title));
    let _ = writeln!(
        opf,
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>",
        escape_xml(identifier)
    );

    let language = if metadata.language.is_empty() {
        "en"
    } else {
        &metadata.language
    };
    let _ = writeln!(opf, "    <dc:language>{}</dc:language>", escape_xml(language));

    for author in &metadata.authors {
        let _ = writeln!(
            opf,
            "    <dc:creator opf:role=\"aut\">{}</dc:creator>",
            escape_xml(author)
        );
    }

    if let Some(ref description) = metadata.description {
        let _ = writeln!(
            opf,
            "    <dc:description>{}</dc:description>",
            escape_xml(description)
        );
    }

    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    opf.push_str(
        "    <item id=\"stylesheet\" href=\"stylesheet.css\" media-type=\"text/css\"/>\n",
    );
    for &uid in order {
        let _ = writeln!(
            opf,
            "    <item id=\"{}\" href=\"{uid}.xhtml\" media-type=\"application/xhtml+xml\"/>",
            manifest_id(uid)
        );
    }

    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    for &uid in order {
        let _ = writeln!(opf, "    <itemref idref=\"{}\"/>", manifest_id(uid));
    }
    opf.push_str("  </spine>\n</package>\n");
    opf
}

fn generate_ncx(metadata: &Metadata, identifier: &str, tree: &PageTree) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    let _ = writeln!(
        ncx,
        "    <meta name=\"dtb:uid\" content=\"{}\"/>",
        escape_xml(identifier)
    );
    let _ = writeln!(
        ncx,
        "    <meta name=\"dtb:depth\" content=\"{}\"/>",
        tree.depth().max(1)
    );
    ncx.push_str(
        r#"    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
"#,
    );
    let _ = writeln!(ncx, "    <text>{}</text>", escape_xml(&metadata.title));
    ncx.push_str("  </docTitle>\n  <navMap>\n");

    let mut play_order = 1;
    for &root in tree.roots() {
        write_nav_point(&mut ncx, tree, root, &mut play_order, 2);
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn write_nav_point(
    ncx: &mut String,
    tree: &PageTree,
    uid: Uid,
    play_order: &mut usize,
    indent: usize,
) {
    let Some(node) = tree.node(uid) else {
        return;
    };
    let indent_str = "  ".repeat(indent);

    let _ = writeln!(
        ncx,
        "{indent_str}<navPoint id=\"navpoint-{play_order}\" playOrder=\"{play_order}\">"
    );
    let _ = writeln!(
        ncx,
        "{indent_str}  <navLabel>\n{indent_str}    <text>{}</text>\n{indent_str}  </navLabel>",
        escape_xml(&node.title)
    );
    let _ = writeln!(ncx, "{indent_str}  <content src=\"{uid}.xhtml\"/>");

    *play_order += 1;

    for &child in &node.children {
        write_nav_point(ncx, tree, child, play_order, indent + 1);
    }

    let _ = writeln!(ncx, "{indent_str}</navPoint>");
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    fn sample_tree() -> PageTree {
        let mut tree = PageTree::new();
        let section = tree.add("Tales", "<div class=\"title2\">Tales</div>", None);
        tree.add("First & Last", "<p>one</p>", Some(section));
        tree.add("Second", "<p>two</p>", Some(section));
        tree
    }

    fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_write_to_memory() {
        let packager = EpubPackager::new(Metadata::new("Book").with_identifier("urn:test"));
        assert_eq!(packager.metadata().identifier, "urn:test");
        let mut buffer = Cursor::new(Vec::new());
        packager.write_to(&sample_tree(), &mut buffer).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");

        let opf = read_entry(&mut archive, "OEBPS/content.opf");
        assert!(opf.contains("<dc:identifier id=\"BookId\">urn:test</dc:identifier>"));
        let spine: Vec<_> = opf.match_indices("<itemref idref=").collect();
        assert_eq!(spine.len(), 3);
        assert!(opf.find("idref=\"page_0\"").unwrap() < opf.find("idref=\"page_2\"").unwrap());

        let page = read_entry(&mut archive, "OEBPS/1.xhtml");
        assert!(page.contains("<title>First &amp; Last</title>"));
        assert!(page.contains("<p>one</p>"));
    }

    #[test]
    fn test_ncx_nests_children() {
        let ncx = generate_ncx(&Metadata::new("Book"), "urn:test", &sample_tree());

        assert!(ncx.contains("<meta name=\"dtb:depth\" content=\"2\"/>"));
        let parent = ncx.find("<content src=\"0.xhtml\"/>").unwrap();
        let child = ncx.find("<content src=\"1.xhtml\"/>").unwrap();
        let parent_close = ncx.rfind("</navPoint>").unwrap();
        assert!(parent < child && child < parent_close);
        assert!(ncx.contains("playOrder=\"3\""));
    }

    #[test]
    fn test_custom_stylesheet() {
        let packager = EpubPackager::new(Metadata::new("Book")).with_config(EpubConfig {
            stylesheet: Some("p { color: red; }".to_string()),
            ..Default::default()
        });
        let mut buffer = Cursor::new(Vec::new());
        packager.write_to(&sample_tree(), &mut buffer).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(
            read_entry(&mut archive, "OEBPS/stylesheet.css"),
            "p { color: red; }"
        );
    }
}
