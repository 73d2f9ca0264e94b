use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, FnArg, GenericArgument, ImplItem, ItemImpl, LitStr, Meta, PathArguments, Type};

const DEFAULT_CONTROLLER: &str = "home";
const DEFAULT_ACTION: &str = "index";

/// Generates a `docview_core::controller::Controller` impl from the route
/// attributes on an impl block.
///
/// A bare `#[get]` / `#[post]` registers the action under the conventional
/// `{controller=Home}/{action=Index}/{id?}` pattern. The controller name is the
/// type name without its `Controller` suffix and the action name is the
/// function name in PascalCase:
///
/// ```rust,ignore
/// pub struct HomeController;
///
/// #[controller(state = AppState)]
/// impl HomeController {
///     #[get]   // "/", "/home", "/home/index", "/home/index/{id}"
///     pub async fn index() -> Html<&'static str> { ... }
///
///     #[get]   // "/home/show/{id}" only; the id is required
///     pub async fn show(Path(id): Path<String>) -> String { ... }
///
///     #[get("/healthz")]   // explicit path, registered as-is
///     pub async fn health() -> &'static str { "ok" }
/// }
/// ```
///
/// Conventional paths are registered in lowercase and also listed in
/// `Controller::conventional_routes`, so the host can match controller and
/// action names without regard to case.
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ControllerArgs);
    let impl_block = parse_macro_input!(input as ItemImpl);
    let self_ty = &impl_block.self_ty;
    let struct_name = match &**self_ty {
        syn::Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => segment.ident.clone(),
            None => {
                return syn::Error::new(impl_block.span(), "Expected a struct type")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(impl_block.span(), "Expected a struct type")
                .to_compile_error()
                .into();
        }
    };

    let struct_name_str = struct_name.to_string();
    let controller_name = struct_name_str
        .strip_suffix("Controller")
        .filter(|name| !name.is_empty())
        .unwrap_or(&struct_name_str)
        .to_string();

    let mut route_registrations = Vec::new();
    let mut prefixes: Vec<String> = Vec::new();

    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let Some(route) = extract_route_attr(&method.attrs) else {
            continue;
        };

        let fn_name = &method.sig.ident;
        let axum_method = format_ident!("{}", route.method);

        let paths = match route.path {
            Some(path) => vec![path],
            None => {
                let action = pascal_case(&fn_name.to_string());
                for prefix in conventional_prefixes(&controller_name, &action) {
                    if !prefixes.contains(&prefix) {
                        prefixes.push(prefix);
                    }
                }
                conventional_paths(&controller_name, &action, id_segment(&method.sig.inputs))
            }
        };

        for path in paths {
            let path_lit = LitStr::new(&path, method.span());
            route_registrations.push(quote! {
                router = router.route(#path_lit, axum::routing::#axum_method(#struct_name::#fn_name));
            });
        }
    }

    let state = args.state;
    let prefix_lits = prefixes.iter().map(|prefix| LitStr::new(prefix, impl_block.span()));

    let expanded = quote! {
        #impl_block

        impl docview_core::controller::Controller for #self_ty {
            type State = #state;

            fn router() -> axum::Router<#state> {
                let mut router = axum::Router::new();

                #(#route_registrations)*

                router
            }

            fn conventional_routes() -> &'static [&'static str] {
                &[#(#prefix_lits),*]
            }
        }
    };

    TokenStream::from(expanded)
}

struct ControllerArgs {
    state: Type,
}

impl syn::parse::Parse for ControllerArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut state: Type = syn::parse_quote!(());

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;

            if key == "state" {
                let _eq: syn::Token![=] = input.parse()?;
                state = input.parse()?;
            } else {
                return Err(syn::Error::new(key.span(), format!("Unknown argument: {}", key)));
            }

            if !input.is_empty() {
                let _comma: syn::Token![,] = input.parse()?;
            }
        }

        Ok(ControllerArgs { state })
    }
}

struct RouteAttr {
    method: String,
    /// `None` for conventional routing.
    path: Option<String>,
}

/// Looks for `#[get]`, `#[get("/path")]` or `#[docview_macros::get(...)]`.
fn extract_route_attr(attrs: &[Attribute]) -> Option<RouteAttr> {
    for attr in attrs {
        let Some(last_segment) = attr.path().segments.last() else {
            continue;
        };

        let method = last_segment.ident.to_string().to_lowercase();
        if !matches!(method.as_str(), "get" | "post" | "put" | "delete" | "patch") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => return Some(RouteAttr { method, path: None }),
            Meta::List(meta) => {
                if let Ok(path_lit) = syn::parse2::<LitStr>(meta.tokens.clone()) {
                    return Some(RouteAttr {
                        method,
                        path: Some(path_lit.value()),
                    });
                }
            }
            Meta::NameValue(_) => {}
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq)]
enum IdSegment {
    Absent,
    Required,
    Optional,
}

fn id_segment(inputs: &syn::punctuated::Punctuated<FnArg, syn::Token![,]>) -> IdSegment {
    for input in inputs {
        let FnArg::Typed(arg) = input else {
            continue;
        };

        match last_ident(&arg.ty).as_deref() {
            Some("Path") => return IdSegment::Required,
            Some("Option") => {
                if first_generic(&arg.ty).and_then(last_ident).as_deref() == Some("Path") {
                    return IdSegment::Optional;
                }
            }
            _ => {}
        }
    }
    IdSegment::Absent
}

fn last_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

fn first_generic(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };

    let PathArguments::AngleBracketed(args) = &type_path.path.segments.last()?.arguments else {
        return None;
    };

    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Lowercase routes for one action under `{controller=Home}/{action=Index}/{id?}`.
fn conventional_paths(controller: &str, action: &str, id: IdSegment) -> Vec<String> {
    let controller = controller.to_lowercase();
    let action = action.to_lowercase();

    let mut bare = Vec::new();
    if controller == DEFAULT_CONTROLLER && action == DEFAULT_ACTION {
        bare.push("/".to_string());
    }
    if action == DEFAULT_ACTION {
        bare.push(format!("/{controller}"));
    }
    bare.push(format!("/{controller}/{action}"));

    let with_id = format!("/{controller}/{action}/{{id}}");

    match id {
        IdSegment::Required => vec![with_id],
        IdSegment::Absent | IdSegment::Optional => {
            bare.push(with_id);
            bare
        }
    }
}

/// Prefixes a request path may spell in any case.
fn conventional_prefixes(controller: &str, action: &str) -> Vec<String> {
    let controller = controller.to_lowercase();
    let action = action.to_lowercase();

    let mut prefixes = Vec::new();
    if action == DEFAULT_ACTION {
        prefixes.push(format!("/{controller}"));
    }
    prefixes.push(format!("/{controller}/{action}"));
    prefixes
}

fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Macro for GET route
#[proc_macro_attribute]
pub fn get(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro(args, input)
}

/// Macro for POST route
#[proc_macro_attribute]
pub fn post(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro(args, input)
}

/// Macro for PUT route
#[proc_macro_attribute]
pub fn put(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro(args, input)
}

/// Macro for DELETE route
#[proc_macro_attribute]
pub fn delete(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro(args, input)
}

/// Macro for PATCH route
#[proc_macro_attribute]
pub fn patch(args: TokenStream, input: TokenStream) -> TokenStream {
    route_attr_macro(args, input)
}

/// Route attributes are read by `#[controller]` before they expand, so on
/// their own they leave the function untouched.
fn route_attr_macro(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}
