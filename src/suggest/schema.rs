// src/suggest/schema.rs
//! Schema declarations in two validation-library idioms.
//!
//! Both renderers read the same leaf table; only the composition
//! syntax (arrays, unions, required-ness) differs between them.

use super::guards::is_identifier;
use crate::patterns::types::Parameter;
use crate::typing::TypeExpr;
use std::fmt::Write;

/// Schema idiom a declaration is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaIdiom {
    Zod,
    Yup,
}

impl SchemaIdiom {
    pub const ALL: [Self; 2] = [Self::Zod, Self::Yup];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Zod => "zod",
            Self::Yup => "yup",
        }
    }

    /// Renders a schema for the parameters of `function_name`.
    #[must_use]
    pub fn render(self, function_name: &str, params: &[Parameter]) -> String {
        match self {
            Self::Zod => render_zod(function_name, params),
            Self::Yup => render_yup(function_name, params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Function,
    Any,
}

/// `(leaf, zod builder, yup builder)`
const LEAVES: &[(Leaf, &str, &str)] = &[
    (Leaf::String, "z.string()", "yup.string()"),
    (Leaf::Number, "z.number()", "yup.number()"),
    (Leaf::Boolean, "z.boolean()", "yup.boolean()"),
    (Leaf::Date, "z.date()", "yup.date()"),
    (Leaf::Object, "z.object({}).passthrough()", "yup.object()"),
    (Leaf::Function, "z.function()", "yup.mixed()"),
    (Leaf::Any, "z.any()", "yup.mixed()"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Leaf(Leaf),
    Array(Box<Fragment>),
    Union(Vec<Fragment>),
}

fn fragment(ty: &TypeExpr) -> Fragment {
    match ty {
        TypeExpr::String => Fragment::Leaf(Leaf::String),
        TypeExpr::Number => Fragment::Leaf(Leaf::Number),
        TypeExpr::Boolean => Fragment::Leaf(Leaf::Boolean),
        TypeExpr::Date => Fragment::Leaf(Leaf::Date),
        TypeExpr::Function => Fragment::Leaf(Leaf::Function),
        TypeExpr::Object
        | TypeExpr::Record
        | TypeExpr::ObjectLiteral
        | TypeExpr::Entity(_)
        | TypeExpr::Intersection(_) => Fragment::Leaf(Leaf::Object),
        TypeExpr::Array(inner) => Fragment::Array(Box::new(fragment(inner))),
        TypeExpr::Promise(inner) => fragment(inner),
        TypeExpr::Union(branches) => Fragment::Union(branches.iter().map(fragment).collect()),
        TypeExpr::Any
        | TypeExpr::Unknown
        | TypeExpr::Void
        | TypeExpr::Null
        | TypeExpr::Undefined
        | TypeExpr::Instance(_)
        | TypeExpr::Other(_) => Fragment::Leaf(Leaf::Any),
    }
}

fn leaf_syntax(leaf: Leaf, idiom: SchemaIdiom) -> &'static str {
    LEAVES
        .iter()
        .find(|(l, _, _)| *l == leaf)
        .map_or("", |&(_, zod, yup)| match idiom {
            SchemaIdiom::Zod => zod,
            SchemaIdiom::Yup => yup,
        })
}

fn zod_fragment(frag: &Fragment) -> String {
    match frag {
        Fragment::Leaf(leaf) => leaf_syntax(*leaf, SchemaIdiom::Zod).to_string(),
        Fragment::Array(inner) => format!("z.array({})", zod_fragment(inner)),
        Fragment::Union(branches) => format!(
            "z.union([{}])",
            branches.iter().map(zod_fragment).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn yup_fragment(frag: &Fragment) -> String {
    match frag {
        Fragment::Leaf(leaf) => leaf_syntax(*leaf, SchemaIdiom::Yup).to_string(),
        Fragment::Array(inner) => format!("yup.array().of({})", yup_fragment(inner)),
        Fragment::Union(_) => leaf_syntax(Leaf::Any, SchemaIdiom::Yup).to_string(),
    }
}

fn fields<'a>(params: &'a [Parameter]) -> impl Iterator<Item = (&'a str, Fragment)> + 'a {
    params
        .iter()
        .filter(|p| is_identifier(&p.name))
        .map(|p| (p.name.as_str(), fragment(&TypeExpr::parse(&p.type_name))))
}

fn render_zod(function_name: &str, params: &[Parameter]) -> String {
    let mut out = format!("import {{ z }} from 'zod';\n\nconst {function_name}Schema = z.object({{\n");
    for (name, frag) in fields(params) {
        let _ = writeln!(out, "  {name}: {},", zod_fragment(&frag));
    }
    out.push_str("});");
    out
}

fn render_yup(function_name: &str, params: &[Parameter]) -> String {
    let mut out =
        format!("import * as yup from 'yup';\n\nconst {function_name}Schema = yup.object({{\n");
    for (name, frag) in fields(params) {
        let _ = writeln!(out, "  {name}: {}.required(),", yup_fragment(&frag));
    }
    out.push_str("});");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::new("user", "object"),
            Parameter::new("roles", "string[]"),
        ]
    }

    #[test]
    fn zod_maps_each_parameter() {
        let schema = SchemaIdiom::Zod.render("processUserData", &params());
        assert!(schema.contains("const processUserDataSchema = z.object({"));
        assert!(schema.contains("user: z.object({}).passthrough(),"));
        assert!(schema.contains("roles: z.array(z.string()),"));
    }

    #[test]
    fn yup_maps_each_parameter() {
        let schema = SchemaIdiom::Yup.render("processUserData", &params());
        assert!(schema.contains("user: yup.object().required(),"));
        assert!(schema.contains("roles: yup.array().of(yup.string()).required(),"));
    }

    #[test]
    fn unions_differ_by_idiom() {
        let p = vec![Parameter::new("id", "string | number")];
        assert!(SchemaIdiom::Zod
            .render("f", &p)
            .contains("z.union([z.string(), z.number()])"));
        assert!(SchemaIdiom::Yup.render("f", &p).contains("id: yup.mixed().required()"));
    }

    #[test]
    fn every_leaf_has_syntax_in_both_idioms() {
        for (leaf, _, _) in LEAVES {
            for idiom in SchemaIdiom::ALL {
                assert!(!leaf_syntax(*leaf, idiom).is_empty());
            }
        }
    }
}
