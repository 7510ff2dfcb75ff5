use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Mark a type as storable in a `presence::Optional`.
///
/// Emits the `Describe` and `Payload` impls for a plain (leaf) type. The
/// type itself still has to satisfy the trait requirements, notably
/// `PartialEq` and `'static`; violations surface as ordinary bound errors.
#[proc_macro_derive(Payload)]
pub fn derive_payload(item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::DeriveInput);

    let name = &item.ident;

    match &item.data {
        syn::Data::Struct(_) | syn::Data::Enum(_) => {}
        syn::Data::Union(_) => {
            panic!("Only structs and enums can be payloads")
        }
    }

    let (impl_generics, ty_generics, where_clause) =
        item.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics presence::Describe for #name #ty_generics #where_clause {
            fn describe(
                registry: &mut presence::TypeRegistry,
            ) -> presence::Ty {
                registry.store::<Self>(presence::TypeShape::Value)
            }
        }

        impl #impl_generics presence::Payload for #name #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}
