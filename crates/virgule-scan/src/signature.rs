// File: src/signature.rs
// Purpose: Structural shape checks for discovered declarations
//
// Everything here inspects syntax only. A declaration either conforms and
// yields a descriptor, or it is skipped; nothing is ever executed.

use syn::{FnArg, GenericArgument, Item, ItemFn, PathArguments, ReturnType, Type, Visibility};

use crate::descriptor::Method;

/// Name of the request-context type a handler must accept.
const CONTEXT_TYPE: &str = "Context";

/// Why a declaration was rejected. Only surfaced as a warning: an invalid
/// shape is a skip, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeIssue {
    NotPublic,
    WrongArity { expected: &'static str, found: usize },
    WrongParamType,
    WrongReturnType,
}

impl std::fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeIssue::NotPublic => write!(f, "function is not pub"),
            ShapeIssue::WrongArity { expected, found } => {
                write!(f, "expected {expected} parameter(s), found {found}")
            }
            ShapeIssue::WrongParamType => {
                write!(f, "parameter must be a reference or Arc to the request context")
            }
            ShapeIssue::WrongReturnType => write!(f, "return type must be a Result"),
        }
    }
}

/// Checks a route-file function: is it a conforming handler, and for which
/// method?
///
/// Returns `Ok(None)` when the name is not a recognized verb (an ordinary
/// helper function, ignored silently), `Ok(Some(method))` for a conforming
/// handler, and `Err(issue)` when the name matches a verb but the shape
/// does not conform.
pub fn handler_method(item: &ItemFn) -> Result<Option<Method>, ShapeIssue> {
    let Some(method) = Method::from_handler_name(&item.sig.ident.to_string()) else {
        return Ok(None);
    };

    if !is_public(&item.vis) {
        return Err(ShapeIssue::NotPublic);
    }

    let inputs = &item.sig.inputs;
    if inputs.len() != 1 {
        return Err(ShapeIssue::WrongArity {
            expected: "exactly one",
            found: inputs.len(),
        });
    }

    if !is_context_param(&inputs[0]) {
        return Err(ShapeIssue::WrongParamType);
    }

    if !returns_result(&item.sig.output) {
        return Err(ShapeIssue::WrongReturnType);
    }

    Ok(Some(method))
}

/// Checks a middleware-file function named `middleware`.
///
/// Two forms conform: a direct wrapper taking the next handler, or a
/// zero-argument factory returning one. Returns whether the declaration is
/// the factory form.
pub fn middleware_shape(item: &ItemFn) -> Result<bool, ShapeIssue> {
    if !is_public(&item.vis) {
        return Err(ShapeIssue::NotPublic);
    }

    match item.sig.inputs.len() {
        0 => {}
        1 => {}
        found => {
            return Err(ShapeIssue::WrongArity {
                expected: "zero or one",
                found,
            })
        }
    }

    // Both forms must produce something; a bare unit return cannot be a
    // wrapper or a factory.
    if matches!(item.sig.output, ReturnType::Default) {
        return Err(ShapeIssue::WrongReturnType);
    }

    Ok(item.sig.inputs.is_empty())
}

/// Checks the proxy declaration: `pub fn proxy(ctx) -> Result<ProxyResult, _>`.
pub fn proxy_shape(item: &ItemFn) -> Result<(), ShapeIssue> {
    if !is_public(&item.vis) {
        return Err(ShapeIssue::NotPublic);
    }

    if item.sig.inputs.len() != 1 {
        return Err(ShapeIssue::WrongArity {
            expected: "exactly one",
            found: item.sig.inputs.len(),
        });
    }

    if !is_context_param(&item.sig.inputs[0]) {
        return Err(ShapeIssue::WrongParamType);
    }

    if !returns_result(&item.sig.output) {
        return Err(ShapeIssue::WrongReturnType);
    }

    Ok(())
}

/// Extracts matcher strings from a `PROXY_MATCHERS` const/static item whose
/// initializer is a literal array of string literals (optionally behind
/// `&`). Returns `None` for any other item.
pub fn proxy_matchers(item: &Item) -> Option<Vec<String>> {
    let (ident, expr) = match item {
        Item::Const(c) if is_public(&c.vis) => (&c.ident, c.expr.as_ref()),
        Item::Static(s) if is_public(&s.vis) => (&s.ident, s.expr.as_ref()),
        _ => return None,
    };

    if ident != "PROXY_MATCHERS" {
        return None;
    }

    string_array_literal(expr)
}

fn string_array_literal(expr: &syn::Expr) -> Option<Vec<String>> {
    let array = match expr {
        syn::Expr::Reference(r) => match r.expr.as_ref() {
            syn::Expr::Array(a) => a,
            _ => return None,
        },
        syn::Expr::Array(a) => a,
        _ => return None,
    };

    array
        .elems
        .iter()
        .map(|elem| match elem {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Some(s.value()),
            _ => None,
        })
        .collect()
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

/// Whether a function argument is a reference (or `Arc`) to the request
/// context type. Matching is by the final path segment, so `&Context`,
/// `&mut Context`, `&virgule::Context`, and `Arc<Context>` all conform.
fn is_context_param(arg: &FnArg) -> bool {
    let FnArg::Typed(pat) = arg else {
        return false;
    };

    match pat.ty.as_ref() {
        Type::Reference(reference) => type_is_context(&reference.elem),
        ty => type_is_arc_of_context(ty),
    }
}

fn type_is_context(ty: &Type) -> bool {
    last_segment_name(ty).is_some_and(|name| name == CONTEXT_TYPE)
}

fn type_is_arc_of_context(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let Some(last) = type_path.path.segments.last() else {
        return false;
    };

    if last.ident != "Arc" {
        return false;
    }

    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return false;
    };

    args.args.iter().any(|arg| match arg {
        GenericArgument::Type(inner) => type_is_context(inner),
        _ => false,
    })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    last_segment_name(ty).is_some_and(|name| name == "Result")
}

fn last_segment_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_fn(src: &str) -> ItemFn {
        syn::parse_str(src).expect("test source must parse")
    }

    #[test]
    fn test_valid_handler_shapes() {
        for src in [
            "pub fn get(c: &Context) -> Result<(), Error> { Ok(()) }",
            "pub async fn post(c: &mut Context) -> Result<(), Error> { Ok(()) }",
            "pub async fn delete(ctx: Arc<Context>) -> virgule::Result { Ok(()) }",
            "pub fn put(c: &virgule::Context) -> anyhow::Result<()> { Ok(()) }",
        ] {
            let item = item_fn(src);
            assert!(
                matches!(handler_method(&item), Ok(Some(_))),
                "should conform: {src}"
            );
        }
    }

    #[test]
    fn test_non_verb_name_is_silently_ignored() {
        let item = item_fn("pub fn helper(c: &Context) -> Result<(), Error> { Ok(()) }");
        assert_eq!(handler_method(&item), Ok(None));
    }

    #[test]
    fn test_private_verb_is_a_skip() {
        let item = item_fn("fn get(c: &Context) -> Result<(), Error> { Ok(()) }");
        assert_eq!(handler_method(&item), Err(ShapeIssue::NotPublic));
    }

    #[test]
    fn test_wrong_arity() {
        let item = item_fn(
            "pub fn patch(c: &Context, extra: String) -> Result<(), Error> { Ok(()) }",
        );
        assert!(matches!(
            handler_method(&item),
            Err(ShapeIssue::WrongArity { .. })
        ));
    }

    #[test]
    fn test_wrong_param_type() {
        let item = item_fn("pub fn get(name: String) -> Result<(), Error> { Ok(()) }");
        assert_eq!(handler_method(&item), Err(ShapeIssue::WrongParamType));
    }

    #[test]
    fn test_wrong_return_type() {
        let item = item_fn("pub fn get(c: &Context) -> String { String::new() }");
        assert_eq!(handler_method(&item), Err(ShapeIssue::WrongReturnType));

        let item = item_fn("pub fn get(c: &Context) { }");
        assert_eq!(handler_method(&item), Err(ShapeIssue::WrongReturnType));
    }

    #[test]
    fn test_middleware_wrapper_form() {
        let item = item_fn("pub fn middleware(next: Handler) -> Handler { next }");
        assert_eq!(middleware_shape(&item), Ok(false));
    }

    #[test]
    fn test_middleware_factory_form() {
        let item =
            item_fn("pub fn middleware() -> impl Fn(Handler) -> Handler { |next| next }");
        assert_eq!(middleware_shape(&item), Ok(true));
    }

    #[test]
    fn test_middleware_too_many_params() {
        let item = item_fn("pub fn middleware(a: Handler, b: Handler) -> Handler { a }");
        assert!(matches!(
            middleware_shape(&item),
            Err(ShapeIssue::WrongArity { .. })
        ));
    }

    #[test]
    fn test_proxy_shape() {
        let item = item_fn(
            "pub async fn proxy(c: &Context) -> Result<ProxyResult, Error> { todo!() }",
        );
        assert_eq!(proxy_shape(&item), Ok(()));

        let item = item_fn("pub fn proxy() -> Result<ProxyResult, Error> { todo!() }");
        assert!(proxy_shape(&item).is_err());
    }

    #[test]
    fn test_proxy_matchers_const() {
        let item: Item = syn::parse_str(
            r#"pub const PROXY_MATCHERS: &[&str] = &["/api/*", "/v1/*"];"#,
        )
        .unwrap();
        assert_eq!(
            proxy_matchers(&item),
            Some(vec!["/api/*".to_string(), "/v1/*".to_string()])
        );
    }

    #[test]
    fn test_proxy_matchers_static() {
        let item: Item =
            syn::parse_str(r#"pub static PROXY_MATCHERS: [&str; 1] = ["/api/*"];"#).unwrap();
        assert_eq!(proxy_matchers(&item), Some(vec!["/api/*".to_string()]));
    }

    #[test]
    fn test_proxy_matchers_other_items_ignored() {
        let item: Item = syn::parse_str(r#"pub const OTHER: &str = "x";"#).unwrap();
        assert_eq!(proxy_matchers(&item), None);

        let item: Item =
            syn::parse_str(r#"const PROXY_MATCHERS: &[&str] = &["/api/*"];"#).unwrap();
        assert_eq!(proxy_matchers(&item), None, "private consts are not read");
    }
}
