extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DataEnum, DeriveInput, Fields, Path, parse_macro_input};

/// Turns an enum of single-field tuple variants into a boxed trait object.
///
/// ```ignore
/// #[derive(IntoTraitObject)]
/// #[trait_name(MigrationStep)]
/// enum MigrationSteps {
///     DeployRolesLibrary(DeployRolesLibraryStep),
/// }
/// ```
///
/// generates `into_trait_object(self) -> Box<dyn MigrationStep>` and
/// `variant_name(&self) -> &'static str`.
#[proc_macro_derive(IntoTraitObject, attributes(trait_name))]
pub fn derive_into_trait_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_name = &input.ident;
    let trait_path = find_trait_name(input)?;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "IntoTraitObject can only be derived for enums",
        ));
    };

    let mut into_arms = Vec::new();
    let mut name_arms = Vec::new();
    for v in variants {
        match &v.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {}
            _ => {
                return Err(syn::Error::new(
                    v.span(),
                    "IntoTraitObject variants must hold exactly one unnamed field",
                ));
            }
        }
        let vname = &v.ident;
        let vname_str = vname.to_string();
        into_arms.push(quote! {
            #enum_name::#vname(data) => Box::new(data) as Box<dyn #trait_path>
        });
        name_arms.push(quote! {
            #enum_name::#vname(_) => #vname_str
        });
    }

    Ok(quote! {
        impl #enum_name {
            pub fn into_trait_object(self) -> Box<dyn #trait_path> {
                match self {
                    #(#into_arms),*
                }
            }

            pub fn variant_name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    })
}

fn find_trait_name(input: &DeriveInput) -> syn::Result<Path> {
    let mut trait_path: Option<Path> = None;
    for attr in &input.attrs {
        if attr.path().is_ident("trait_name") {
            attr.parse_nested_meta(|meta| {
                trait_path = Some(meta.path.clone());
                Ok(())
            })?;
        }
    }
    trait_path.ok_or_else(|| {
        syn::Error::new(
            input.span(),
            "You must specify #[trait_name(TraitName)] on the enum when using #[derive(IntoTraitObject)]",
        )
    })
}
