use super::{Decoder, Mapper, Model, Record};
use crate::{driver::ResultSet, driver::Row, Error, Result};

/// Decodes rows of one result set into a model.
///
/// Column positions and decoders are resolved once per result set; rows only pay for
/// the decoding itself.
pub struct RowDecoder {
    model: &'static str,
    slots: Vec<Slot>,
}

struct Slot {
    property: &'static str,
    index: usize,
    decoder: Decoder,
}

impl RowDecoder {
    pub(super) fn new<M: Model>(mapper: &Mapper, columns: &[String]) -> Result<Self> {
        let descriptor = M::describe();
        let table = mapper.table_by_ty(descriptor.ty);
        let mut slots = Vec::with_capacity(descriptor.properties.len());

        for property in &descriptor.properties {
            let Some(index) = columns.iter().position(|column| column == property.name) else {
                if property.defaulted || property.nullable {
                    continue;
                }
                return Err(crate::err!(
                    "result set has no column for property `{}`",
                    property.name
                )
                .context(Error::mapping(descriptor.name)));
            };

            let decoder = match table.and_then(|table| table.column(property.name)) {
                Some(column) => column.decoder,
                None => {
                    mapper
                        .serializer_for(descriptor.ty, property.name, property.ty)?
                        .decoder
                }
            };

            slots.push(Slot {
                property: property.name,
                index,
                decoder,
            });
        }

        Ok(Self {
            model: descriptor.name,
            slots,
        })
    }

    pub fn decode<M: Model>(&self, row: &dyn Row) -> Result<M> {
        let mut record = Record::new(self.model);

        for slot in &self.slots {
            let value = (slot.decoder)(row, slot.index)
                .map_err(|err| err.context(Error::mapping(self.model)))?;
            record.insert(slot.property, value);
        }

        M::load(record).map_err(|err| err.context(Error::mapping(self.model)))
    }

    /// Drains `results`, decoding every row.
    pub fn decode_all<M: Model>(&self, results: &mut dyn ResultSet) -> Result<Vec<M>> {
        let mut out = vec![];
        while let Some(row) = results.next()? {
            out.push(self.decode(row)?);
        }
        Ok(out)
    }
}

impl core::fmt::Debug for RowDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("RowDecoder")
            .field("model", &self.model)
            .field(
                "columns",
                &self
                    .slots
                    .iter()
                    .map(|slot| (slot.property, slot.index))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
