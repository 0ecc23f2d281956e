//! Attribute macro behind the `const-switch` crate. Use it through the `const_switch` facade, which
//! also provides the runtime items the expansion refers to.

use proc_macro::TokenStream;
use proc_macro2::{Span as Span2, TokenStream as TokenStream2};
use quote::{format_ident, quote, ToTokens};
use syn::{
    bracketed,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    ConstParam, Error, Expr, ExprLit, ExprUnary, FnArg, GenericParam, Generics, Ident,
    ImplItem, ImplItemFn, ItemImpl, Lit, Result, ReturnType, Token, Type, UnOp,
};

/// Calling convention shared by `when` and `otherwise`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
enum Arity {
    /// Handlers declare their parameters one by one and `dispatch` mirrors them.
    #[default]
    Fixed,
    /// Handlers take a single generic argument pack which `dispatch` forwards as is.
    Variadic,
}

/// A single option of the attribute.
///
/// # Example Inputs
///
/// ```
/// cases = [1, 4, 6, 10]
/// variadic
/// arity = fixed
/// ```
#[derive(Debug, Eq, PartialEq)]
enum SwitchOption {
    Cases {
        key: Ident,
        cases: Punctuated<Expr, Token![,]>,
    },
    Arity {
        key: Ident,
        arity: Arity,
    },
}

impl SwitchOption {
    fn key(&self) -> &Ident {
        match self {
            Self::Cases { key, .. } | Self::Arity { key, .. } => key,
        }
    }
}

impl Parse for SwitchOption {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        match key.to_string().as_str() {
            "cases" => {
                let _ = input.parse::<Token![=]>()?;
                let content;
                let _ = bracketed!(content in input);
                let cases = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
                Ok(Self::Cases { key, cases })
            }
            "variadic" => Ok(Self::Arity {
                key,
                arity: Arity::Variadic,
            }),
            "arity" => {
                let _ = input.parse::<Token![=]>()?;
                let value: Ident = input.parse()?;
                let arity = match value.to_string().as_str() {
                    "fixed" => Arity::Fixed,
                    "variadic" => Arity::Variadic,
                    _ => return Err(Error::new(value.span(), "expected `fixed` or `variadic`")),
                };
                Ok(Self::Arity { key, arity })
            }
            _ => Err(Error::new(
                key.span(),
                "unknown option, expected `cases`, `variadic` or `arity`",
            )),
        }
    }
}

/// Arguments of the `const_switch` attribute.
///
/// # Example Input
///
/// ```
/// cases = [20, 30], variadic
/// ```
#[derive(Debug, Eq, PartialEq)]
struct SwitchArgs {
    cases: Vec<Expr>,
    arity: Arity,
}

impl Parse for SwitchArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let options = Punctuated::<SwitchOption, Token![,]>::parse_terminated(input)?;

        let mut cases = None;
        let mut arity = None;
        for option in options {
            let key = option.key().clone();
            let duplicate = match option {
                SwitchOption::Cases { cases: list, .. } => {
                    if list.is_empty() {
                        return Err(Error::new(key.span(), "at least one case is required"));
                    }
                    let list = list.into_iter().collect::<Vec<_>>();
                    cases.replace(list).map(|_| "`cases` given twice")
                }
                SwitchOption::Arity { arity: value, .. } => arity
                    .replace(value)
                    .map(|_| "calling convention given twice"),
            };
            if let Some(msg) = duplicate {
                return Err(Error::new(key.span(), msg));
            }
        }

        let cases = cases.ok_or_else(|| input.error("missing `cases = [...]`"))?;
        check_unique_cases(&cases)?;
        Ok(Self {
            cases,
            arity: arity.unwrap_or_default(),
        })
    }
}

/// Value of a case as far as it can be known while expanding.
#[derive(Debug, Eq, PartialEq)]
enum CaseKey {
    Int(i128),
    Char(char),
    Bool(bool),
    Tokens(String),
}

fn case_key(expr: &Expr) -> CaseKey {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Int(int) => int.base10_parse().map(CaseKey::Int).ok(),
            Lit::Char(c) => Some(CaseKey::Char(c.value())),
            Lit::Bool(b) => Some(CaseKey::Bool(b.value)),
            _ => None,
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match case_key(expr) {
            CaseKey::Int(value) => value.checked_neg().map(CaseKey::Int),
            _ => None,
        },
        _ => None,
    }
    .unwrap_or_else(|| CaseKey::Tokens(expr.to_token_stream().to_string()))
}

/// Rejects cases which are provably equal. Anything else equal only after const evaluation is
/// shadowed by the earlier case.
fn check_unique_cases(cases: &[Expr]) -> Result<()> {
    let keys: Vec<_> = cases.iter().map(case_key).collect();
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(Error::new_spanned(&cases[i], "duplicate case"));
        }
    }
    Ok(())
}

/// Handlers picked from the annotated impl block.
struct Handlers<'a> {
    when: &'a ImplItemFn,
    otherwise: Option<&'a ImplItemFn>,
    compare: Option<&'a ImplItemFn>,
}

impl<'a> Handlers<'a> {
    fn find(item: &'a ItemImpl) -> Result<Self> {
        let mut when = None;
        let mut otherwise = None;
        let mut compare = None;
        for impl_item in &item.items {
            if let ImplItem::Fn(f) = impl_item {
                let slot = match f.sig.ident.to_string().as_str() {
                    "when" => &mut when,
                    "otherwise" => &mut otherwise,
                    "compare" => &mut compare,
                    _ => continue,
                };
                if let Some(receiver) = f.sig.receiver() {
                    return Err(Error::new_spanned(
                        receiver,
                        "handlers of a const switch must be associated functions",
                    ));
                }
                *slot = Some(f);
            }
        }
        let when = when.ok_or_else(|| {
            Error::new_spanned(
                &item.self_ty,
                "expected a handler `fn when<const V: T>(...)` in this impl block",
            )
        })?;
        Ok(Self {
            when,
            otherwise,
            compare,
        })
    }

    fn case_param(&self) -> Result<&'a ConstParam> {
        let mut consts = self.when.sig.generics.params.iter().filter_map(|p| match p {
            GenericParam::Const(c) => Some(c),
            _ => None,
        });
        match (consts.next(), consts.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::new_spanned(
                &self.when.sig.generics,
                "`when` must take exactly one const generic parameter, the matched case",
            )),
        }
    }

    /// Checks that `when` and `otherwise` agree on the calling convention.
    fn check_arity(&self, arity: Arity) -> Result<()> {
        let when_inputs = self.when.sig.inputs.len();
        if arity == Arity::Variadic && when_inputs != 1 {
            return Err(Error::new_spanned(
                &self.when.sig,
                "a variadic `when` takes exactly one parameter, the argument pack",
            ));
        }
        if let Some(otherwise) = self.otherwise {
            if otherwise.sig.inputs.is_empty() {
                return Err(Error::new_spanned(
                    &otherwise.sig,
                    "`otherwise` must take the unmatched case value as its first parameter",
                ));
            }
            if otherwise.sig.inputs.len() != when_inputs + 1 {
                let msg = match arity {
                    Arity::Fixed => {
                        "`otherwise` must take the case value followed by the parameters of `when`"
                    }
                    Arity::Variadic => {
                        "a variadic `otherwise` takes the case value and one argument pack"
                    }
                };
                return Err(Error::new_spanned(&otherwise.sig, msg));
            }
        }
        if let Some(compare) = self.compare {
            if compare.sig.inputs.len() != 2 {
                return Err(Error::new_spanned(
                    &compare.sig,
                    "`compare` takes the declared case and the value, both by reference",
                ));
            }
        }
        Ok(())
    }
}

/// Everything needed to generate the case walk.
struct CaseWalk<'a> {
    value: Ident,
    args: Vec<Ident>,
    turbofish: Vec<Option<&'a Ident>>,
    custom_compare: bool,
    custom_fallback: bool,
}

impl CaseWalk<'_> {
    fn comparison(&self, case: &Expr) -> TokenStream2 {
        let value = &self.value;
        if self.custom_compare {
            quote! { Self::compare(&(#case), &#value) }
        } else {
            quote! { (#case) == #value }
        }
    }

    fn handler_call(&self, case: &Expr) -> TokenStream2 {
        let args = &self.args;
        let generic_args = self.turbofish.iter().map(|arg| match arg {
            Some(ident) => quote! { #ident },
            None => quote! { { #case } },
        });
        let call = quote! { Self::when::<#(#generic_args),*>(#(#args),*) };
        if self.custom_fallback {
            call
        } else {
            quote! { ::core::result::Result::Ok(#call) }
        }
    }

    fn fallback_call(&self) -> TokenStream2 {
        let value = &self.value;
        let args = &self.args;
        if self.custom_fallback {
            quote! { Self::otherwise(#value, #(#args),*) }
        } else {
            quote! {
                ::core::result::Result::Err(::const_switch::__private::unknown_case::<Self>())
            }
        }
    }

    /// Emits `if head { .. } else if next { .. } else { fallback }`, peeling one case per level.
    fn generate(&self, cases: &[Expr]) -> TokenStream2 {
        match cases.split_first() {
            None => {
                let fallback = self.fallback_call();
                quote! { { #fallback } }
            }
            Some((head, tail)) => {
                let condition = self.comparison(head);
                let matched = self.handler_call(head);
                let rest = self.generate(tail);
                quote! {
                    if #condition {
                        #matched
                    } else #rest
                }
            }
        }
    }
}

/// Generics of `dispatch`: the generics of `when` without the case parameter.
fn dispatch_generics(when: &ImplItemFn) -> Generics {
    let mut generics = when.sig.generics.clone();
    generics.params = generics
        .params
        .into_iter()
        .filter(|p| !matches!(p, GenericParam::Const(_)))
        .collect();
    generics
}

fn dispatch_doc(args: &SwitchArgs) -> String {
    let cases: Vec<_> = args
        .cases
        .iter()
        .map(|case| format!("`{}`", case.to_token_stream()))
        .collect();
    format!(
        "Calls `when` specialized on the first of {} equal to `value`, \
         or the fallback if none is.",
        cases.join(", ")
    )
}

fn expand(args: SwitchArgs, mut item: ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(Error::new_spanned(
            path,
            "#[const_switch] must be placed on an inherent impl block",
        ));
    }

    let handlers = Handlers::find(&item)?;
    let case_param = handlers.case_param()?;
    handlers.check_arity(args.arity)?;

    let case_ty = &case_param.ty;
    let when_sig = &handlers.when.sig;
    let arg_types = when_sig.inputs.iter().filter_map(|input| match input {
        FnArg::Typed(pat) => Some(&pat.ty),
        FnArg::Receiver(_) => None,
    });

    let walk = CaseWalk {
        value: Ident::new("value", Span2::mixed_site()),
        args: (0..when_sig.inputs.len())
            .map(|i| format_ident!("arg{}", i, span = Span2::mixed_site()))
            .collect(),
        turbofish: when_sig
            .generics
            .params
            .iter()
            .filter_map(|p| match p {
                GenericParam::Lifetime(_) => None,
                GenericParam::Type(t) => Some(Some(&t.ident)),
                GenericParam::Const(_) => Some(None),
            })
            .collect(),
        custom_compare: handlers.compare.is_some(),
        custom_fallback: handlers.otherwise.is_some(),
    };

    let result_ty: Type = match &when_sig.output {
        ReturnType::Default => syn::parse_quote!(()),
        ReturnType::Type(_, ty) => (**ty).clone(),
    };
    let output = if walk.custom_fallback {
        quote! { #result_ty }
    } else {
        quote! { ::core::result::Result<#result_ty, ::const_switch::UnknownCase> }
    };

    let generics = dispatch_generics(handlers.when);
    let (generic_params, _, where_clause) = generics.split_for_impl();
    let value = &walk.value;
    let arg_idents = &walk.args;
    let body = walk.generate(&args.cases);
    let doc = dispatch_doc(&args);
    let cases = &args.cases;

    let generated = quote! {
        /// Declared cases in the order they are tried.
        #[allow(dead_code)]
        pub const CASES: &'static [#case_ty] = &[#(#cases),*];

        #[doc = #doc]
        #[inline]
        pub fn dispatch #generic_params (
            #value: #case_ty,
            #(#arg_idents: #arg_types),*
        ) -> #output #where_clause {
            #body
        }
    };
    item.items.push(ImplItem::Verbatim(generated));
    Ok(item.into_token_stream())
}

/// Turns an inherent impl block with a `fn when<const V: T>(...)` handler into a dispatcher over
/// the listed cases. Please see the documentation of the `const_switch` crate for the full
/// contract.
#[proc_macro_attribute]
pub fn const_switch(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as SwitchArgs);
    let item = parse_macro_input!(item as ItemImpl);
    let original = item.to_token_stream();
    match expand(args, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let mut tokens = original;
            tokens.extend(err.to_compile_error());
            tokens.into()
        }
    }
}
