use crate::db::Entity;
use crate::models::{Address, ConsumptionRecord, Device, LoyaltyPoint, Room, User, Validate};

/// An entity exposed under `/ecosave/{PATH}`.
pub trait Resource: Entity + Validate {
    /// Path segment after `/ecosave/`.
    const PATH: &'static str;
    /// Body of the 404 for a missing id.
    const NOT_FOUND: &'static str;
    /// Body of the 400 when the payload id differs from the path id.
    const ID_MISMATCH: &'static str;

    #[must_use]
    fn collection_path() -> String {
        format!("/ecosave/{}", Self::PATH)
    }

    #[must_use]
    fn member_path() -> String {
        format!("/ecosave/{}/{{id}}", Self::PATH)
    }

    /// Value of the `Location` header for a stored record.
    #[must_use]
    fn location(id: Self::Id) -> String {
        format!("/ecosave/{}/{id}", Self::PATH)
    }
}

impl Resource for User {
    const PATH: &'static str = "usuarios";
    const NOT_FOUND: &'static str = "Usuário não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao usuário.";
}

impl Resource for Address {
    const PATH: &'static str = "enderecos";
    const NOT_FOUND: &'static str = "Endereço não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao endereço.";
}

impl Resource for Device {
    const PATH: &'static str = "dispositivos";
    const NOT_FOUND: &'static str = "Dispositivo não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao dispositivo.";
}

impl Resource for Room {
    const PATH: &'static str = "comodos";
    const NOT_FOUND: &'static str = "Cômodo não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao cômodo.";
}

impl Resource for ConsumptionRecord {
    const PATH: &'static str = "consumos";
    const NOT_FOUND: &'static str = "Consumo não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao consumo.";
}

impl Resource for LoyaltyPoint {
    const PATH: &'static str = "pontos";
    const NOT_FOUND: &'static str = "Ponto não encontrado.";
    const ID_MISMATCH: &'static str = "O ID informado não corresponde ao ponto.";
}

#[cfg(test)]
mod tests {
    use ecosave_core::DeviceId;

    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Device::collection_path(), "/ecosave/dispositivos");
        assert_eq!(Device::member_path(), "/ecosave/dispositivos/{id}");
        assert_eq!(Device::location(DeviceId::new(12)), "/ecosave/dispositivos/12");
    }
}
