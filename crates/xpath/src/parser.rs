//! A `nom`-based parser for path expressions.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, u64 as nom_u64},
    combinator::{map, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};

const TYPE_TAGS: [(&str, ValueType); 4] = [
    ("node:", ValueType::Node),
    ("string:", ValueType::String),
    ("number:", ValueType::Number),
    ("boolean:", ValueType::Boolean),
];

/// Parses a path expression, including an optional result type tag and dot notation.
pub fn parse_path_expression(input: &str) -> Result<PathExpression, XPathError> {
    let (value_type, body) = split_type_tag(input.trim());

    let expression = if is_dot_notation(body) {
        Expression::LocationPath(parse_dot_notation(input, body)?)
    } else {
        match expression(body) {
            Ok(("", expr)) => expr,
            Ok((rem, _)) => {
                return Err(XPathError::XPathParse(
                    input.to_string(),
                    format!("Parser did not consume all input. Remainder: '{}'", rem),
                ));
            }
            Err(e) => return Err(XPathError::XPathParse(input.to_string(), e.to_string())),
        }
    };

    Ok(PathExpression {
        value_type,
        expression,
    })
}

fn split_type_tag(input: &str) -> (ValueType, &str) {
    for (prefix, value_type) in TYPE_TAGS {
        if let Some(rest) = input.strip_prefix(prefix) {
            return (value_type, rest.trim_start());
        }
    }
    (ValueType::Node, input)
}

fn is_dot_notation(input: &str) -> bool {
    !input.starts_with('.')
        && input.contains('.')
        && !input.contains(['/', '(', '[', '\'', '"', ' '])
}

fn parse_dot_notation(original: &str, body: &str) -> Result<LocationPath, XPathError> {
    let segments: Vec<&str> = body.split('.').collect();
    let mut steps = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let is_last = index + 1 == segments.len();
        let (axis, name) = match segment.strip_prefix('@') {
            Some(attr) if is_last => (Axis::Attribute, attr),
            Some(_) => {
                return Err(XPathError::XPathParse(
                    original.to_string(),
                    "Attribute segments are only allowed at the end of a dot-notation path"
                        .to_string(),
                ));
            }
            None if is_last => (Axis::ChildOrAttribute, *segment),
            None => (Axis::Child, *segment),
        };

        match q_name(name) {
            Ok(("", name_test)) => steps.push(Step {
                axis,
                node_test: NodeTest::Name(name_test),
                predicates: vec![],
            }),
            _ => {
                return Err(XPathError::XPathParse(
                    original.to_string(),
                    format!("Invalid dot-notation segment '{}'", segment),
                ));
            }
        }
    }

    Ok(LocationPath {
        is_absolute: true,
        steps,
    })
}

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn descendant_step() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        node_test: NodeTest::Node,
        predicates: vec![],
    }
}

fn expression(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        function_call,
        map(string_literal, Expression::Literal),
        map(location_path, Expression::LocationPath),
    )))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.'),
    ))
    .parse(input)
}

fn q_name(input: &str) -> IResult<&str, NameTest> {
    map(pair(nc_name, opt(preceded(char(':'), nc_name))), |(first, second)| {
        match second {
            Some(local) => NameTest {
                prefix: Some(first.to_string()),
                local_name: local.to_string(),
            },
            None => NameTest {
                prefix: None,
                local_name: first.to_string(),
            },
        }
    })
    .parse(input)
}

fn empty_parens(input: &str) -> IResult<&str, ()> {
    map(pair(ws(char('(')), char(')')), |_| ()).parse(input)
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Wildcard, char('*')),
        value(NodeTest::Text, pair(tag("text"), empty_parens)),
        value(NodeTest::Node, pair(tag("node"), empty_parens)),
        map(q_name, NodeTest::Name),
    ))
    .parse(input)
}

fn axis(input: &str) -> IResult<&str, Axis> {
    let names = alt((
        value(Axis::DescendantOrSelf, tag("descendant-or-self")),
        value(Axis::Descendant, tag("descendant")),
        value(Axis::Attribute, tag("attribute")),
        value(Axis::Parent, tag("parent")),
        value(Axis::SelfAxis, tag("self")),
        value(Axis::Child, tag("child")),
    ));
    terminated(names, tag("::")).parse(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    delimited(
        ws(char('[')),
        alt((
            map(nom_u64, |n| Predicate::Position(n as usize)),
            value(Predicate::Last, pair(tag("last"), empty_parens)),
            map(
                separated_pair(preceded(char('@'), q_name), ws(char('=')), string_literal),
                |(name, literal)| Predicate::AttributeEquals {
                    name,
                    value: literal,
                },
            ),
            map(
                separated_pair(q_name, ws(char('=')), string_literal),
                |(name, literal)| Predicate::ChildEquals {
                    name,
                    value: literal,
                },
            ),
        )),
        ws(char(']')),
    )
    .parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    let (i, (axis, node_test)) = alt((
        value((Axis::Parent, NodeTest::Node), tag("..")),
        value((Axis::SelfAxis, NodeTest::Node), char('.')),
        map(preceded(char('@'), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    ))
    .parse(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((tag("//"), tag("/"))).parse(input)
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let (i, leading) = opt(separator).parse(input)?;
    let (i, first) = match leading {
        Some("/") => opt(step).parse(i)?,
        _ => map(step, Some).parse(i)?,
    };

    let mut steps = Vec::new();
    if leading == Some("//") {
        steps.push(descendant_step());
    }
    steps.extend(first);

    let (i, rest) = many0(pair(separator, step)).parse(i)?;
    for (sep, next) in rest {
        if sep == "//" {
            steps.push(descendant_step());
        }
        steps.push(next);
    }

    Ok((
        i,
        LocationPath {
            is_absolute: leading.is_some(),
            steps,
        },
    ))
}

fn function_call(input: &str) -> IResult<&str, Expression> {
    // text(), node() and last() belong to steps and predicates.
    let (i, name) = recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)?;
    if matches!(name, "text" | "node" | "last") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (i, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;

    Ok((
        i,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(local: &str) -> NodeTest {
        NodeTest::Name(NameTest {
            prefix: None,
            local_name: local.to_string(),
        })
    }

    fn child(local: &str) -> Step {
        Step {
            axis: Axis::Child,
            node_test: name(local),
            predicates: vec![],
        }
    }

    #[test]
    fn test_parse_absolute_path() {
        let parsed = parse_path_expression("/root/element").unwrap();
        assert_eq!(parsed.value_type, ValueType::Node);
        assert_eq!(
            parsed.expression,
            Expression::LocationPath(LocationPath {
                is_absolute: true,
                steps: vec![child("root"), child("element")],
            })
        );
    }

    #[test]
    fn test_parse_descendant_path_with_attribute() {
        let parsed = parse_path_expression("//element/@attributeA").unwrap();
        let Expression::LocationPath(path) = parsed.expression else {
            panic!("expected a location path");
        };
        assert_eq!(path.steps.len(), 3);
        assert_eq!(path.steps[0].axis, Axis::DescendantOrSelf);
        assert_eq!(path.steps[2].axis, Axis::Attribute);
        assert_eq!(path.steps[2].node_test, name("attributeA"));
    }

    #[test]
    fn test_parse_dot_notation() {
        let parsed = parse_path_expression("root.element.sub-element").unwrap();
        let Expression::LocationPath(path) = parsed.expression else {
            panic!("expected a location path");
        };
        assert!(path.is_absolute);
        assert_eq!(path.steps[0], child("root"));
        assert_eq!(path.steps[2].axis, Axis::ChildOrAttribute);
        assert_eq!(path.steps[2].node_test, name("sub-element"));
    }

    #[test]
    fn test_parse_type_tag_and_function() {
        let parsed = parse_path_expression("number: count(//item)").unwrap();
        assert_eq!(parsed.value_type, ValueType::Number);
        match parsed.expression {
            Expression::FunctionCall { name, args } => {
                assert_eq!(name, "count");
                assert_eq!(args.len(), 1);
                assert!(args[0].is_location_path());
            }
            other => panic!("expected a function call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_predicates_and_prefixes() {
        let parsed = parse_path_expression("/ns1:root/ns1:item[@type='x'][2]/text()").unwrap();
        let Expression::LocationPath(path) = parsed.expression else {
            panic!("expected a location path");
        };
        assert_eq!(
            path.steps[0].node_test,
            NodeTest::Name(NameTest {
                prefix: Some("ns1".to_string()),
                local_name: "root".to_string(),
            })
        );
        assert_eq!(path.steps[1].predicates.len(), 2);
        assert_eq!(path.steps[1].predicates[1], Predicate::Position(2));
        assert_eq!(path.steps[2].node_test, NodeTest::Text);
    }

    #[test]
    fn test_parse_child_value_predicate_and_parent_step() {
        let parsed = parse_path_expression("//item[name='pen']/../@id").unwrap();
        let Expression::LocationPath(path) = parsed.expression else {
            panic!("expected a location path");
        };
        assert!(matches!(
            &path.steps[1].predicates[0],
            Predicate::ChildEquals { value, .. } if value == "pen"
        ));
        assert_eq!(path.steps[2].axis, Axis::Parent);
    }

    #[test]
    fn test_parse_document_node_and_explicit_axes() {
        assert_eq!(
            parse_path_expression("/").unwrap().expression,
            Expression::LocationPath(LocationPath {
                is_absolute: true,
                steps: vec![],
            })
        );

        let parsed = parse_path_expression("descendant::order//self::node()").unwrap();
        let Expression::LocationPath(path) = parsed.expression else {
            panic!("expected a location path");
        };
        assert!(!path.is_absolute);
        let axes: Vec<Axis> = path.steps.iter().map(|s| s.axis).collect();
        assert_eq!(
            axes,
            vec![Axis::Descendant, Axis::DescendantOrSelf, Axis::SelfAxis]
        );
        assert_eq!(path.steps[2].node_test, NodeTest::Node);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_path_expression("/root/[").is_err());
        assert!(parse_path_expression("root.@id.name").is_err());
    }
}
