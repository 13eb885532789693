//! Arena-backed values reconstructed from the export token stream.
//!
//! A [`Record`] owns every node of one export item in a flat arena. Nested
//! lists and maps refer to their children by [`NodeId`], so the reconstructor
//! can keep a stack of open container indices instead of moving partially
//! built containers around.

use std::borrow::Cow;

use serde_json::{Map, Number, Value};

/// A leaf value from the token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }

    /// Render as output text. Null has no textual form.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(true) => Some(Cow::Borrowed("true")),
            Scalar::Bool(false) => Some(Cow::Borrowed("false")),
            Scalar::Number(number) => Some(Cow::Owned(number.to_string())),
            Scalar::String(value) => Some(Cow::Borrowed(value)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(value) => Value::Bool(*value),
            Scalar::Number(number) => Value::Number(number.clone()),
            Scalar::String(value) => Value::String(value.clone()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}

/// Index of a node inside a [`Record`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Shape of a container, shared by token streams and arena nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Map,
}

/// One arena node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    List(Vec<NodeId>),
    Map(Vec<(String, NodeId)>),
}

impl Node {
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Node::Scalar(_) => None,
            Node::List(_) => Some(ContainerKind::List),
            Node::Map(_) => Some(ContainerKind::Map),
        }
    }
}

/// One reconstructed export item: ordered top-level fields over a node arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    nodes: Vec<Node>,
    fields: Vec<(String, NodeId)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached scalar node.
    pub fn alloc_scalar(&mut self, scalar: Scalar) -> NodeId {
        self.alloc(Node::Scalar(scalar))
    }

    /// Allocate a detached, empty container node.
    pub fn alloc_container(&mut self, kind: ContainerKind) -> NodeId {
        match kind {
            ContainerKind::List => self.alloc(Node::List(Vec::new())),
            ContainerKind::Map => self.alloc(Node::Map(Vec::new())),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Container shape of a node, or `None` for scalars.
    pub fn container_kind(&self, id: NodeId) -> Option<ContainerKind> {
        self.nodes.get(id.0).and_then(Node::container_kind)
    }

    /// Append `child` to the list node `list`. Returns false if `list` is not a list.
    pub fn push_item(&mut self, list: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(list.0) {
            Some(Node::List(items)) => {
                items.push(child);
                true
            }
            _ => false,
        }
    }

    /// Assign `child` under `key` in the map node `map`, replacing in place.
    /// Returns false if `map` is not a map.
    pub fn insert_entry(&mut self, map: NodeId, key: String, child: NodeId) -> bool {
        match self.nodes.get_mut(map.0) {
            Some(Node::Map(entries)) => {
                upsert(entries, key, child);
                true
            }
            _ => false,
        }
    }

    /// Assign a top-level field to an already allocated node.
    pub fn set_field(&mut self, key: String, id: NodeId) {
        upsert(&mut self.fields, key, id);
    }

    /// Assign a scalar top-level field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        let id = self.alloc_scalar(value.into());
        self.set_field(key.into(), id);
    }

    /// Assign a list-of-scalars top-level field.
    pub fn insert_list<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        let list = self.alloc_container(ContainerKind::List);
        for value in values {
            let item = self.alloc_scalar(value.into());
            self.push_item(list, item);
        }
        self.set_field(key.into(), list);
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<ValueRef<'_>> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, id)| ValueRef {
                record: self,
                id: *id,
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    /// Detach a top-level field. Its nodes stay in the arena until the record drops.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.fields.iter().position(|(name, _)| name == key) {
            Some(index) => {
                self.fields.remove(index);
                true
            }
            None => false,
        }
    }

    /// Top-level fields in first-insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, ValueRef<'_>)> {
        self.fields.iter().map(move |(name, id)| {
            (
                name.as_str(),
                ValueRef {
                    record: self,
                    id: *id,
                },
            )
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Materialize as JSON, for diagnostics and tests.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.fields() {
            map.insert(name.to_string(), value.to_json());
        }
        Value::Object(map)
    }
}

fn upsert(entries: &mut Vec<(String, NodeId)>, key: String, id: NodeId) {
    match entries.iter_mut().find(|(name, _)| *name == key) {
        Some(entry) => entry.1 = id,
        None => entries.push((key, id)),
    }
}

/// Borrowed view of one node in a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct ValueRef<'a> {
    record: &'a Record,
    id: NodeId,
}

impl<'a> ValueRef<'a> {
    pub fn node(&self) -> &'a Node {
        &self.record.nodes[self.id.0]
    }

    pub fn as_scalar(&self) -> Option<&'a Scalar> {
        match self.node() {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn is_list(&self) -> bool {
        matches!(self.node(), Node::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.node(), Node::Map(_))
    }

    /// Items of a list node; empty for anything else.
    pub fn items(&self) -> impl Iterator<Item = ValueRef<'a>> + use<'a> {
        let record = self.record;
        let ids: &'a [NodeId] = match self.node() {
            Node::List(ids) => ids,
            _ => &[],
        };
        ids.iter().map(move |id| ValueRef { record, id: *id })
    }

    /// Entries of a map node in insertion order; empty for anything else.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, ValueRef<'a>)> + use<'a> {
        let record = self.record;
        let entries: &'a [(String, NodeId)] = match self.node() {
            Node::Map(entries) => entries,
            _ => &[],
        };
        entries
            .iter()
            .map(move |(key, id)| (key.as_str(), ValueRef { record, id: *id }))
    }

    /// Look up a key of a map node.
    pub fn get(&self, key: &str) -> Option<ValueRef<'a>> {
        self.entries().find(|(name, _)| *name == key).map(|(_, v)| v)
    }

    /// The scalar itself, or the first item of a multi-valued field.
    pub fn first_scalar(&self) -> Option<&'a Scalar> {
        match self.node() {
            Node::Scalar(scalar) => Some(scalar),
            Node::List(_) => self.items().next().and_then(|item| item.as_scalar()),
            Node::Map(_) => None,
        }
    }

    /// Every scalar of a single- or multi-valued field, in order.
    pub fn scalars(&self) -> Vec<&'a Scalar> {
        match self.node() {
            Node::Scalar(scalar) => vec![scalar],
            Node::List(_) => self.items().filter_map(|item| item.as_scalar()).collect(),
            Node::Map(_) => Vec::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self.node() {
            Node::Scalar(scalar) => scalar.to_json(),
            Node::List(_) => Value::Array(self.items().map(|item| item.to_json()).collect()),
            Node::Map(_) => {
                let mut map = Map::new();
                for (key, value) in self.entries() {
                    map.insert(key.to_string(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}
