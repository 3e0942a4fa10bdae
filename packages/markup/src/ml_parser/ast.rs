//! Syntax Tree
//!
//! Arena-backed concrete syntax tree produced by the markup parser.
//! Every source character belongs to exactly one leaf; error nodes are
//! ordinary nodes carrying a [`ParseMessage`].

use serde::Serialize;

use super::messages::ParseMessage;
use super::tokens::TokenType;
use crate::parse_util::TextRange;

/// Composite node types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    HtmlDocument,
    HtmlTag,
    XmlAttribute,
    XmlAttributeValue,
    XmlText,
    XmlComment,
    XmlCdata,
    XmlProlog,
    XmlDoctype,
    XmlProcessingInstruction,
    XmlEntityRef,
    /// Node type contributed by an embedded dialect
    Custom(&'static str),
}

impl ElementType {
    pub fn debug_name(self) -> String {
        let name = match self {
            ElementType::HtmlDocument => "HTML_DOCUMENT",
            ElementType::HtmlTag => "HTML_TAG",
            ElementType::XmlAttribute => "XML_ATTRIBUTE",
            ElementType::XmlAttributeValue => "XML_ATTRIBUTE_VALUE",
            ElementType::XmlText => "XML_TEXT",
            ElementType::XmlComment => "XML_COMMENT",
            ElementType::XmlCdata => "XML_CDATA",
            ElementType::XmlProlog => "XML_PROLOG",
            ElementType::XmlDoctype => "XML_DOCTYPE",
            ElementType::XmlProcessingInstruction => "XML_PROCESSING_INSTRUCTION",
            ElementType::XmlEntityRef => "XML_ENTITY_REF",
            ElementType::Custom(name) => return name.to_string(),
        };
        name.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Element(ElementType),
    Token(TokenType),
    Error(ParseMessage),
}

impl NodeKind {
    pub fn debug_name(&self) -> String {
        match self {
            NodeKind::Element(kind) => kind.debug_name(),
            NodeKind::Token(kind) => kind.debug_name(),
            NodeKind::Error(_) => "ERROR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    range: TextRange,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An error node lifted out of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: TextRange,
    pub message: ParseMessage,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: String,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn new(text: String) -> Self {
        SyntaxTree {
            text,
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            range,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        });
        id
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let last = self.data(parent).last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = Some(parent);
            node.prev_sibling = last;
        }
        match last {
            Some(last) => self.nodes[last.0 as usize].next_sibling = Some(child),
            None => self.nodes[parent.0 as usize].first_child = Some(child),
        }
        self.nodes[parent.0 as usize].last_child = Some(child);
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Error nodes in document order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.root()
            .descendants()
            .filter_map(|node| {
                node.error().map(|message| Diagnostic {
                    range: node.range(),
                    message: message.clone(),
                })
            })
            .collect()
    }

    /// Concatenated text of every leaf, in order
    pub fn leaf_text(&self) -> String {
        self.root()
            .descendants()
            .filter(|node| node.token_type().is_some())
            .map(|node| node.text())
            .collect()
    }

    /// Indented outline of the tree, one node per line. Nodes nested deeper
    /// than [`MAX_INDENT`] levels carry a `[depth]` prefix instead of more
    /// indentation.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0)];
        while let Some((node, depth)) = stack.pop() {
            write_indent(&mut out, depth);
            out.push_str(&node.kind().debug_name());
            match node.kind() {
                NodeKind::Token(_) => {
                    out.push_str(&format!("('{}')", escape(node.text())));
                }
                NodeKind::Error(message) => {
                    out.push_str(&format!("('{}')", message));
                }
                NodeKind::Element(_) => {}
            }
            out.push('\n');
            let start = stack.len();
            stack.extend(node.children().map(|child| (child, depth + 1)));
            stack[start..].reverse();
        }
        out
    }

    /// JSON rendering of the tree: every node is an object with `kind` and
    /// `range`; leaves add `text`, error nodes add `message` and `error`,
    /// composite nodes add `children`. Written without recursion, so any
    /// nesting depth renders.
    pub fn to_json(&self) -> serde_json::Result<String> {
        enum Step<'t> {
            Open(SyntaxNode<'t>, usize),
            Close(usize),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(self.root(), 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node, depth) => {
                    if depth > 0 {
                        out.push_str(if node.prev_sibling().is_some() { ",\n" } else { "\n" });
                    }
                    write_indent(&mut out, depth);
                    let range = node.range();
                    out.push_str(&format!(
                        "{{\"kind\": {}, \"range\": [{}, {}]",
                        serde_json::to_string(&node.kind().debug_name())?,
                        range.start,
                        range.end
                    ));
                    match node.kind() {
                        NodeKind::Token(_) => {
                            out.push_str(&format!(", \"text\": {}}}", serde_json::to_string(node.text())?));
                        }
                        NodeKind::Error(message) => {
                            out.push_str(&format!(
                                ", \"message\": {}, \"error\": {}}}",
                                serde_json::to_string(&message.to_string())?,
                                serde_json::to_string(message)?
                            ));
                        }
                        NodeKind::Element(_) if node.first_child().is_none() => {
                            out.push_str(", \"children\": []}");
                        }
                        NodeKind::Element(_) => {
                            out.push_str(", \"children\": [");
                            stack.push(Step::Close(depth));
                            let start = stack.len();
                            stack.extend(node.children().map(|child| Step::Open(child, depth + 1)));
                            stack[start..].reverse();
                        }
                    }
                }
                Step::Close(depth) => {
                    out.push('\n');
                    write_indent(&mut out, depth);
                    out.push_str("]}");
                }
            }
        }
        out.push('\n');
        Ok(out)
    }
}

/// Deepest level rendered as indentation by the tree dumps
pub const MAX_INDENT: usize = 64;

fn write_indent(out: &mut String, depth: usize) {
    out.push_str(&"  ".repeat(depth.min(MAX_INDENT)));
    if depth > MAX_INDENT {
        out.push_str(&format!("[{}] ", depth));
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Borrowed view of one node
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'t NodeKind {
        &self.tree.data(self.id).kind
    }

    pub fn element_type(&self) -> Option<ElementType> {
        match self.kind() {
            NodeKind::Element(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn token_type(&self) -> Option<TokenType> {
        match self.kind() {
            NodeKind::Token(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&'t ParseMessage> {
        match self.kind() {
            NodeKind::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn range(&self) -> TextRange {
        self.tree.data(self.id).range
    }

    pub fn text(&self) -> &'t str {
        let range = self.range();
        &self.tree.text[range.start..range.end]
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.tree.data(self.id).parent.map(|id| self.tree.node(id))
    }

    pub fn first_child(&self) -> Option<SyntaxNode<'t>> {
        self.tree.data(self.id).first_child.map(|id| self.tree.node(id))
    }

    pub fn last_child(&self) -> Option<SyntaxNode<'t>> {
        self.tree.data(self.id).last_child.map(|id| self.tree.node(id))
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'t>> {
        self.tree.data(self.id).next_sibling.map(|id| self.tree.node(id))
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode<'t>> {
        self.tree.data(self.id).prev_sibling.map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = SyntaxNode<'t>> {
        std::iter::successors(self.first_child(), |node| node.next_sibling())
    }

    /// Pre-order traversal including this node
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants { stack: vec![*self] }
    }

    /// Direct children that are composite nodes of the given type
    pub fn children_of(&self, kind: ElementType) -> impl Iterator<Item = SyntaxNode<'t>> {
        self.children().filter(move |c| c.element_type() == Some(kind))
    }

    /// Text of the first name token directly under this node
    pub fn tag_name(&self) -> Option<&'t str> {
        self.children()
            .find(|c| c.token_type() == Some(TokenType::Name))
            .map(|c| c.text())
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind(), NodeKind::Error(_))
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.kind().debug_name(), self.range())
    }
}

pub struct Descendants<'t> {
    stack: Vec<SyntaxNode<'t>>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.children());
        self.stack[start..].reverse();
        Some(node)
    }
}
