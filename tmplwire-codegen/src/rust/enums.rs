//! Packet dispatch code generation.
//!
//! Emits the `PacketType` enum with its command-id dispatch table and the
//! `AnyPacket` enum holding one decoded packet of any type.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use tmplwire_core::Frequency;
use tmplwire_schema::TemplateIr;
use tmplwire_schema::ir::ResolvedPacket;

/// Generator for the template-wide dispatch enums.
pub struct EnumGenerator<'a> {
    ir: &'a TemplateIr,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(ir: &'a TemplateIr) -> Self {
        Self { ir }
    }

    /// Generates `PacketType` and `AnyPacket`.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.generate_packet_type().to_string());
        output.push_str("\n\n");
        output.push_str(&self.generate_any_packet().to_string());
        output.push('\n');
        output
    }

    fn generate_packet_type(&self) -> TokenStream {
        let packets = &self.ir.packets;
        let variants: Vec<_> = packets.iter().map(variant_ident).collect();
        let structs: Vec<_> = packets.iter().map(struct_ident).collect();
        let names: Vec<_> = packets.iter().map(|p| p.name.as_str()).collect();
        let docs: Vec<_> = packets
            .iter()
            .map(|p| format!(" `{}` ({} {}).", p.name, p.frequency, p.id))
            .collect();
        let arms: Vec<_> = packets.iter().map(dispatch_arm).collect();
        let count = Literal::usize_unsuffixed(packets.len());

        quote! {
            #[doc = " Packet types declared in the template."]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub enum PacketType {
                #[doc = " No packet is registered for the command."]
                #[default]
                Default,
                #(
                    #[doc = #docs]
                    #variants,
                )*
            }

            impl PacketType {
                #[doc = " Every packet type, in template order."]
                pub const ALL: [Self; #count] = [#(Self::#variants),*];

                #[doc = " Resolves a decoded command framing to its packet type."]
                #[doc = ""]
                #[doc = " Fixed packets are framed as Low and resolve from either class."]
                #[must_use]
                pub const fn from_command(id: u16, frequency: Frequency) -> Self {
                    match (frequency, id) {
                        #(#arms)*
                        _ => Self::Default,
                    }
                }

                #[doc = " Returns the template name of the packet type."]
                #[must_use]
                pub const fn name(&self) -> &'static str {
                    match self {
                        Self::Default => "Default",
                        #(Self::#variants => #names,)*
                    }
                }

                #[doc = " Decodes a payload that starts with a command framing."]
                #[doc = ""]
                #[doc = " # Errors"]
                #[doc = " Returns `Error::UnknownCommand` if no packet matches the framing,"]
                #[doc = " or any decoding error from the packet body."]
                pub fn decode(payload: &[u8]) -> Result<AnyPacket> {
                    let (frequency, id) = WireReader::new(payload).read_command()?;
                    match Self::from_command(id, frequency) {
                        #(Self::#variants => #structs::from_payload(payload).map(AnyPacket::#variants),)*
                        Self::Default => Err(Error::UnknownCommand {
                            frequency: frequency.as_str(),
                            id,
                        }),
                    }
                }
            }

            impl fmt::Display for PacketType {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }
        }
    }

    fn generate_any_packet(&self) -> TokenStream {
        let packets = &self.ir.packets;
        let variants: Vec<_> = packets.iter().map(variant_ident).collect();
        let structs: Vec<_> = packets.iter().map(struct_ident).collect();

        quote! {
            #[doc = " One decoded packet of any template type."]
            #[derive(Debug, Clone, PartialEq)]
            pub enum AnyPacket {
                #(#variants(#structs),)*
            }

            impl AnyPacket {
                #[doc = " Returns the packet type."]
                #[must_use]
                pub const fn packet_type(&self) -> PacketType {
                    match self {
                        #(Self::#variants(_) => PacketType::#variants,)*
                    }
                }

                #[doc = " Encodes the command framing followed by the body."]
                #[doc = ""]
                #[doc = " # Errors"]
                #[doc = " Returns an error if the body cannot be encoded."]
                pub fn to_payload(&self) -> Result<Vec<u8>> {
                    match self {
                        #(Self::#variants(packet) => packet.to_payload(),)*
                    }
                }
            }

            impl fmt::Display for AnyPacket {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self {
                        #(Self::#variants(packet) => write!(f, "{}", packet),)*
                    }
                }
            }
        }
    }
}

fn variant_ident(packet: &ResolvedPacket) -> proc_macro2::Ident {
    format_ident!("{}", packet.variant)
}

fn struct_ident(packet: &ResolvedPacket) -> proc_macro2::Ident {
    format_ident!("{}", packet.struct_name)
}

/// One `from_command` match arm.
fn dispatch_arm(packet: &ResolvedPacket) -> TokenStream {
    let variant = variant_ident(packet);
    let id = Literal::u16_suffixed(packet.id);
    let frequency = match packet.frequency {
        Frequency::Fixed => quote!(Frequency::Low | Frequency::Fixed),
        other => {
            let class = format_ident!("{}", other.as_str());
            quote!(Frequency::#class)
        }
    };
    quote! {
        (#frequency, #id) => Self::#variant,
    }
}
