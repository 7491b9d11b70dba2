//! Defines the Abstract Syntax Tree (AST) for path expressions.

/// How the addressed value is coerced before it is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    /// The string value of the single addressed node.
    #[default]
    Node,
    String,
    Number,
    Boolean,
}

impl ValueType {
    pub fn tag(self) -> &'static str {
        match self {
            ValueType::Node => "node",
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
        }
    }
}

/// A parsed path expression together with its optional type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub value_type: ValueType,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(String),
    LocationPath(LocationPath),
    FunctionCall { name: String, args: Vec<Expression> },
}

impl Expression {
    /// Checks if the expression is a `LocationPath` variant.
    pub fn is_location_path(&self) -> bool {
        matches!(self, Expression::LocationPath(_))
    }
}

/// A full location path, like `/root/item[1]` or `//item/@id`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// True if the path starts from the document node (`/foo`).
    ///
    /// Relative paths are evaluated against the document node as well, so `root/a`
    /// and `/root/a` select the same element.
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    SelfAxis,
    /// Child elements, falling back to attributes when no child matches. Only produced
    /// for the last segment of a dot-notation path.
    ChildOrAttribute,
}

/// A possibly prefixed name. The prefix is resolved through the evaluation context's
/// namespace map; an unprefixed test matches on the local name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    pub prefix: Option<String>,
    pub local_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    Name(NameTest),
    Wildcard,
    Text,
    Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]`, 1-based.
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name='value']`
    AttributeEquals { name: NameTest, value: String },
    /// `[name='value']`, compared against the trimmed text of the child element.
    ChildEquals { name: NameTest, value: String },
}
