//! Locates well-known nodes of `problem.xml`
use super::PackageError;
use std::{collections::HashMap, path::Path};

pub type Node<'a, 'input> = roxmltree::Node<'a, 'input>;

/// Tags resolved once per package
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Problem,
    Names,
    Judging,
    Solutions,
    Checker,
    Interactor,
    TimeLimit,
    MemoryLimit,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Problem => "problem",
            Tag::Names => "names",
            Tag::Judging => "judging",
            Tag::Solutions => "solutions",
            Tag::Checker => "checker",
            Tag::Interactor => "interactor",
            Tag::TimeLimit => "time-limit",
            Tag::MemoryLimit => "memory-limit",
        }
    }

    fn is_required(self) -> bool {
        self != Tag::Interactor
    }
}

const DOCUMENT_TAGS: &[Tag] = &[
    Tag::Problem,
    Tag::Names,
    Tag::Judging,
    Tag::Solutions,
    Tag::Checker,
    Tag::Interactor,
];

const LIMIT_TAGS: &[Tag] = &[Tag::TimeLimit, Tag::MemoryLimit];

/// Depth-first search for `wanted` tags under `node` (inclusive).
///
/// Fails if some wanted tag occurs more than once.
pub fn find_tags<'a, 'input>(
    node: Node<'a, 'input>,
    wanted: &[&str],
) -> Result<HashMap<String, Option<Node<'a, 'input>>>, PackageError> {
    let mut results: HashMap<String, Option<Node>> =
        wanted.iter().map(|k| (k.to_string(), None)).collect();
    for n in node.descendants().filter(|n| n.is_element()) {
        if let Some(slot) = results.get_mut(n.tag_name().name()) {
            if slot.is_some() {
                return Err(PackageError::DuplicateTag(n.tag_name().name().to_string()));
            }
            *slot = Some(n);
        }
    }
    Ok(results)
}

/// Fails if some of `required` was not found
pub fn check_nodes(
    nodes: &HashMap<String, Option<Node>>,
    required: &[&str],
) -> Result<(), PackageError> {
    for k in required {
        if nodes.get(*k).map_or(true, Option::is_none) {
            return Err(PackageError::MissingTag(k.to_string()));
        }
    }
    Ok(())
}

/// Finds exactly one `wanted` tag under `node`
pub fn find_unique<'a, 'input>(
    node: Node<'a, 'input>,
    wanted: &str,
) -> Result<Node<'a, 'input>, PackageError> {
    find_tags(node, &[wanted])?
        .remove(wanted)
        .flatten()
        .ok_or_else(|| PackageError::MissingTag(wanted.to_string()))
}

pub fn attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, PackageError> {
    node.attribute(name)
        .ok_or_else(|| PackageError::MissingAttribute {
            tag: node.tag_name().name().to_string(),
            attribute: name.to_string(),
        })
}

pub fn text<'a>(node: Node<'a, '_>) -> Result<&'a str, PackageError> {
    node.text()
        .map(str::trim)
        .ok_or_else(|| PackageError::BadValue {
            tag: node.tag_name().name().to_string(),
            value: String::new(),
        })
}

pub fn parse_text<T: std::str::FromStr>(node: Node) -> Result<T, PackageError> {
    let value = text(node)?;
    value.parse().map_err(|_| PackageError::BadValue {
        tag: node.tag_name().name().to_string(),
        value: value.to_string(),
    })
}

/// Parsed `problem.xml` with resolved well-known nodes.
///
/// Built once per package and borrowed by every conversion step.
pub struct PackageIndex<'input> {
    doc: roxmltree::Document<'input>,
    nodes: HashMap<Tag, roxmltree::NodeId>,
}

impl<'input> PackageIndex<'input> {
    pub fn read_manifest(src_root: &Path) -> Result<String, PackageError> {
        let path = src_root.join("problem.xml");
        std::fs::read_to_string(&path).map_err(|source| PackageError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolves tags in manifest text
    pub fn parse(manifest: &'input str) -> Result<PackageIndex<'input>, PackageError> {
        let doc = roxmltree::Document::parse(manifest).map_err(|source| PackageError::XmlSyn {
            path: "problem.xml".to_string(),
            source,
        })?;
        let nodes = resolve(&doc)?;
        Ok(PackageIndex { doc, nodes })
    }

    pub fn get(&self, tag: Tag) -> Option<Node<'_, 'input>> {
        self.nodes.get(&tag).and_then(|&id| self.doc.get_node(id))
    }

    /// Returns required node.
    ///
    /// # Panics
    /// Panics if called with `Tag::Interactor`, which is optional
    pub fn node(&self, tag: Tag) -> Node<'_, 'input> {
        assert!(tag.is_required(), "{} is optional", tag.name());
        self.get(tag).expect("required tags are checked on construction")
    }

    pub fn is_interactive(&self) -> bool {
        self.get(Tag::Interactor).is_some()
    }

    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }
}

fn resolve(doc: &roxmltree::Document) -> Result<HashMap<Tag, roxmltree::NodeId>, PackageError> {
    let mut resolved = HashMap::new();
    let names: Vec<&str> = DOCUMENT_TAGS.iter().map(|t| t.name()).collect();
    let nodes = find_tags(doc.root_element(), &names)?;
    let required: Vec<&str> = DOCUMENT_TAGS
        .iter()
        .filter(|t| t.is_required())
        .map(|t| t.name())
        .collect();
    check_nodes(&nodes, &required)?;
    for &tag in DOCUMENT_TAGS {
        if let Some(Some(node)) = nodes.get(tag.name()) {
            resolved.insert(tag, node.id());
        }
    }

    // limits are declared per testset, first testset is authoritative
    let judging = doc
        .get_node(resolved[&Tag::Judging])
        .expect("id from the same document");
    let first_testset = judging
        .first_element_child()
        .ok_or_else(|| PackageError::MissingTag("testset".to_string()))?;
    let names: Vec<&str> = LIMIT_TAGS.iter().map(|t| t.name()).collect();
    let nodes = find_tags(first_testset, &names)?;
    check_nodes(&nodes, &names)?;
    for &tag in LIMIT_TAGS {
        if let Some(Some(node)) = nodes.get(tag.name()) {
            resolved.insert(tag, node.id());
        }
    }
    Ok(resolved)
}
