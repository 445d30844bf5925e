use contracts::domain::a001_offer::{
    Bandwidth, BandwidthScope, Capacity, Database, Dns, Port, ResourceAttributes, Vpn,
};
use contracts::usecases::u501_sync_offers::BssAttribute;

use super::errors::MappingError;

/// Код атрибута, значение "VPN" которого переключает скорость канала на VPN
pub const ACCESS_TYPE_CODE: &str = "C_DATAC_ACCESS_TYPE";
const VPN_ACCESS: &str = "VPN";

/// Признак "ресурс входит в базовое предложение"
const INCLUDED_QUALIFIER: &str = "1";

type Handler = fn(&mut ResourceBuilder, &BssAttribute) -> Result<(), MappingError>;

/// Таблица обработчиков: код атрибута -> функция, заполняющая агрегат.
/// Коды, которых здесь нет, пропускаются.
const HANDLERS: &[(&str, Handler)] = &[
    ("CN_ALIAS_NUM", alias_qty),
    ("C_BD_NUM", database_qty),
    ("CN_BD_SPACE", database_amount),
    ("C_BD_SPACE_UNIT", database_unit),
    ("CN_CPU_NUM", cpu_qty),
    ("CN_FTP_NUM", ftp_qty),
    ("CN_PORT_NUM", network_interface_qty),
    ("CN_IP_NUM", public_ip_address),
    ("CN_RAM_SPACE", ram_amount),
    ("C_RAM_SPACE_UNIT", ram_unit),
    ("C_DISK_SPACE", hdd_amount),
    ("C_DISK_SPACE_UNIT", hdd_unit),
    ("C_RATE_NUM", rate_amount),
    ("C_RATE_UNIT", rate_unit),
    ("CN_VPN_LANIP", vpn_ip_address),
    ("CN_VPN_NAME", vpn_name),
    ("CN_DNS", dns_value),
    ("CN_DNS_CNAME", dns_name),
    ("C_ACCESS_TYPE", bandwidth_scope),
    (ACCESS_TYPE_CODE, access_type),
    ("CN_VPS_LANIP", lan_ip_address),
    ("CN_VPS_WANIP", wan_ip_address),
    ("C_SAVEVM_FALG", save_vm),
    ("C_PROTOCOLO_PUERTO", port_description),
];

/// Собрать технические характеристики из плоского списка атрибутов.
///
/// Возвращает `None`, если ни один атрибут не относится к ресурсам.
/// Повторный код перезаписывает предыдущее значение. Ошибка разбора
/// числа отменяет весь результат.
pub fn map_attributes(
    attributes: &[BssAttribute],
) -> Result<Option<ResourceAttributes>, MappingError> {
    let mut builder = ResourceBuilder {
        attributes: None,
        vpn_access: has_vpn_access(attributes),
    };

    for attribute in attributes {
        if let Some(handler) = handler_for(&attribute.code) {
            handler(&mut builder, attribute)?;
        }
    }

    Ok(builder.finish())
}

fn handler_for(code: &str) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, handler)| *handler)
}

/// Скорость канала относится к VPN, только если где-то в списке
/// (в любом месте) есть тип доступа "VPN"
fn has_vpn_access(attributes: &[BssAttribute]) -> bool {
    attributes
        .iter()
        .any(|attr| attr.code == ACCESS_TYPE_CODE && attr.value == VPN_ACCESS)
}

struct ResourceBuilder {
    attributes: Option<ResourceAttributes>,
    vpn_access: bool,
}

impl ResourceBuilder {
    /// Агрегат, в который пишет очередной атрибут. Флаг `included`
    /// сбрасывается первым опциональным атрибутом и больше не поднимается.
    fn touch(&mut self, attr: &BssAttribute) -> &mut ResourceAttributes {
        let attributes = self
            .attributes
            .get_or_insert_with(ResourceAttributes::default);
        if attr.attr_type != INCLUDED_QUALIFIER {
            attributes.included = false;
        }
        attributes
    }

    fn finish(self) -> Option<ResourceAttributes> {
        self.attributes.map(|mut attributes| {
            attributes.apply_default_units();
            attributes
        })
    }
}

fn parse_int(attr: &BssAttribute) -> Result<i64, MappingError> {
    attr.value
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid_number(attr))
}

pub(crate) fn parse_float(attr: &BssAttribute) -> Result<f64, MappingError> {
    match attr.value.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid_number(attr)),
    }
}

fn invalid_number(attr: &BssAttribute) -> MappingError {
    MappingError::InvalidNumber {
        code: attr.code.clone(),
        value: attr.value.clone(),
    }
}

// ----------------------------------------------------------------------------
// Handlers
// ----------------------------------------------------------------------------

fn alias_qty(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_int(attr)?;
    b.touch(attr).alias_qty = Some(value);
    Ok(())
}

fn database_qty(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_int(attr)?;
    database(b.touch(attr)).quantity = value;
    Ok(())
}

fn database_amount(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_float(attr)?;
    database(b.touch(attr)).amount = value;
    Ok(())
}

fn database_unit(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    database(b.touch(attr)).unit = attr.value.clone();
    Ok(())
}

fn cpu_qty(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_int(attr)?;
    b.touch(attr).cpu_qty = Some(value);
    Ok(())
}

fn ftp_qty(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_int(attr)?;
    b.touch(attr).ftp_qty = Some(value);
    Ok(())
}

fn network_interface_qty(
    b: &mut ResourceBuilder,
    attr: &BssAttribute,
) -> Result<(), MappingError> {
    let value = parse_int(attr)?;
    b.touch(attr).network_interface_qty = Some(value);
    Ok(())
}

fn public_ip_address(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr).public_ip_address = Some(attr.value.clone());
    Ok(())
}

fn ram_amount(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_float(attr)?;
    capacity(&mut b.touch(attr).ram).amount = value;
    Ok(())
}

fn ram_unit(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    capacity(&mut b.touch(attr).ram).unit = attr.value.clone();
    Ok(())
}

fn hdd_amount(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_float(attr)?;
    capacity(&mut b.touch(attr).hdd).amount = value;
    Ok(())
}

fn hdd_unit(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    capacity(&mut b.touch(attr).hdd).unit = attr.value.clone();
    Ok(())
}

fn rate_amount(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let value = parse_float(attr)?;
    let vpn_access = b.vpn_access;
    let attributes = b.touch(attr);
    if vpn_access {
        vpn(attributes).speed = value;
    } else {
        bandwidth(attributes).amount = value;
    }
    Ok(())
}

fn rate_unit(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let vpn_access = b.vpn_access;
    let attributes = b.touch(attr);
    if vpn_access {
        vpn(attributes).unit = attr.value.clone();
    } else {
        bandwidth(attributes).unit = attr.value.clone();
    }
    Ok(())
}

fn vpn_ip_address(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    vpn(b.touch(attr)).ip_address = attr.value.clone();
    Ok(())
}

fn vpn_name(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    vpn(b.touch(attr)).name = attr.value.clone();
    Ok(())
}

fn dns_value(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    dns(b.touch(attr)).value = attr.value.clone();
    Ok(())
}

fn dns_name(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    dns(b.touch(attr)).name = attr.value.clone();
    Ok(())
}

fn bandwidth_scope(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    let scope = if attr.value == "1" {
        BandwidthScope::International
    } else {
        BandwidthScope::National
    };
    bandwidth(b.touch(attr)).scope = Some(scope);
    Ok(())
}

fn access_type(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr).access_type = Some(attr.value.clone());
    Ok(())
}

fn lan_ip_address(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr).lan_ip_address = Some(attr.value.clone());
    Ok(())
}

fn wan_ip_address(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr).wan_ip_address = Some(attr.value.clone());
    Ok(())
}

fn save_vm(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr).save_vm = Some(attr.value == "1");
    Ok(())
}

fn port_description(b: &mut ResourceBuilder, attr: &BssAttribute) -> Result<(), MappingError> {
    b.touch(attr)
        .port
        .get_or_insert_with(Port::default)
        .description = attr.value.clone();
    Ok(())
}

fn database(attributes: &mut ResourceAttributes) -> &mut Database {
    attributes.database.get_or_insert_with(Database::default)
}

fn capacity(slot: &mut Option<Capacity>) -> &mut Capacity {
    slot.get_or_insert_with(Capacity::default)
}

fn vpn(attributes: &mut ResourceAttributes) -> &mut Vpn {
    attributes.vpn.get_or_insert_with(Vpn::default)
}

fn dns(attributes: &mut ResourceAttributes) -> &mut Dns {
    attributes.dns.get_or_insert_with(Dns::default)
}

fn bandwidth(attributes: &mut ResourceAttributes) -> &mut Bandwidth {
    attributes.bandwidth.get_or_insert_with(Bandwidth::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(code: &str, value: &str) -> BssAttribute {
        BssAttribute::new(code, value, "1")
    }

    fn map(attributes: &[BssAttribute]) -> ResourceAttributes {
        map_attributes(attributes).unwrap().unwrap()
    }

    #[test]
    fn rate_goes_to_vpn_when_access_type_is_vpn() {
        let mapped = map(&[attr("C_DATAC_ACCESS_TYPE", "VPN"), attr("C_RATE_NUM", "10")]);

        assert_eq!(mapped.vpn.as_ref().map(|vpn| vpn.speed), Some(10.0));
        assert!(mapped.bandwidth.is_none());
        assert_eq!(mapped.access_type.as_deref(), Some("VPN"));
    }

    #[test]
    fn vpn_lookup_does_not_depend_on_order() {
        let mapped = map(&[
            attr("C_RATE_NUM", "10"),
            attr("C_RATE_UNIT", "Mbps"),
            attr("C_DATAC_ACCESS_TYPE", "VPN"),
        ]);

        let vpn = mapped.vpn.unwrap();
        assert_eq!(vpn.speed, 10.0);
        assert_eq!(vpn.unit, "Mbps");
        assert!(mapped.bandwidth.is_none());
    }

    #[test]
    fn rate_goes_to_bandwidth_without_vpn_access() {
        let mapped = map(&[attr("C_RATE_NUM", "10"), attr("C_ACCESS_TYPE", "1")]);

        let bandwidth = mapped.bandwidth.unwrap();
        assert_eq!(bandwidth.amount, 10.0);
        assert_eq!(bandwidth.unit, "MB");
        assert_eq!(bandwidth.scope, Some(BandwidthScope::International));
        assert!(mapped.vpn.is_none());
    }

    #[test]
    fn empty_unit_defaults_to_mb() {
        let mapped = map(&[attr("C_RAM_SPACE_UNIT", "")]);
        assert_eq!(mapped.ram.unwrap().unit, "MB");

        let mapped = map(&[attr("CN_RAM_SPACE", "2"), attr("C_DISK_SPACE_UNIT", "GB")]);
        let ram = mapped.ram.unwrap();
        assert_eq!(ram.amount, 2.0);
        assert_eq!(ram.unit, "MB");
        assert_eq!(mapped.hdd.unwrap().unit, "GB");
    }

    #[test]
    fn non_numeric_value_fails_the_whole_list() {
        let result = map_attributes(&[attr("CN_RAM_SPACE", "4"), attr("CN_CPU_NUM", "abc")]);

        assert_eq!(
            result,
            Err(MappingError::InvalidNumber {
                code: "CN_CPU_NUM".into(),
                value: "abc".into(),
            })
        );
    }

    #[test]
    fn empty_or_infinite_numbers_are_rejected() {
        assert!(map_attributes(&[attr("C_BD_NUM", "")]).is_err());
        assert!(map_attributes(&[attr("CN_BD_SPACE", "inf")]).is_err());
        assert!(map_attributes(&[attr("C_DISK_SPACE", "NaN")]).is_err());
    }

    #[test]
    fn included_flag_is_sticky() {
        let mapped = map(&[
            BssAttribute::new("CN_CPU_NUM", "2", "1"),
            BssAttribute::new("CN_FTP_NUM", "1", "0"),
            BssAttribute::new("CN_ALIAS_NUM", "3", "1"),
        ]);
        assert!(!mapped.included);

        let mapped = map(&[attr("CN_CPU_NUM", "2")]);
        assert!(mapped.included);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let mapped = map(&[attr("CN_CPU_NUM", "2"), attr("CN_CPU_NUM", "8")]);
        assert_eq!(mapped.cpu_qty, Some(8));
    }

    #[test]
    fn no_resource_codes_means_no_aggregate() {
        assert_eq!(map_attributes(&[]), Ok(None));
        assert_eq!(
            map_attributes(&[attr("C_PH2_SERVICE_TYPE", "VPS"), attr("UNKNOWN", "x")]),
            Ok(None)
        );
    }

    #[test]
    fn every_field_is_routed() {
        let mapped = map(&[
            attr("CN_ALIAS_NUM", "2"),
            attr("C_BD_NUM", "1"),
            attr("CN_BD_SPACE", "512"),
            attr("C_BD_SPACE_UNIT", "MB"),
            attr("CN_PORT_NUM", "2"),
            attr("CN_IP_NUM", "1"),
            attr("CN_VPN_LANIP", "10.0.0.1"),
            attr("CN_VPN_NAME", "corp"),
            attr("CN_DNS", "ns1.example.cu"),
            attr("CN_DNS_CNAME", "www"),
            attr("CN_VPS_LANIP", "192.168.0.2"),
            attr("CN_VPS_WANIP", "200.0.0.2"),
            attr("C_SAVEVM_FALG", "1"),
            attr("C_PROTOCOLO_PUERTO", "TCP 443"),
        ]);

        assert_eq!(mapped.alias_qty, Some(2));
        assert_eq!(
            mapped.database,
            Some(Database {
                quantity: 1,
                amount: 512.0,
                unit: "MB".into(),
            })
        );
        assert_eq!(mapped.network_interface_qty, Some(2));
        assert_eq!(mapped.public_ip_address.as_deref(), Some("1"));
        let vpn = mapped.vpn.unwrap();
        assert_eq!((vpn.ip_address.as_str(), vpn.name.as_str()), ("10.0.0.1", "corp"));
        let dns = mapped.dns.unwrap();
        assert_eq!((dns.name.as_str(), dns.value.as_str()), ("www", "ns1.example.cu"));
        assert_eq!(mapped.lan_ip_address.as_deref(), Some("192.168.0.2"));
        assert_eq!(mapped.wan_ip_address.as_deref(), Some("200.0.0.2"));
        assert_eq!(mapped.save_vm, Some(true));
        assert_eq!(mapped.port.unwrap().description, "TCP 443");
    }

    #[test]
    fn national_scope_for_any_other_access_value() {
        let mapped = map(&[attr("C_ACCESS_TYPE", "0")]);
        assert_eq!(
            mapped.bandwidth.unwrap().scope,
            Some(BandwidthScope::National)
        );
    }

    #[test]
    fn offer_level_codes_are_not_resources() {
        assert!(handler_for("C_RATE_NUM").is_some());
        assert!(handler_for("C_PH2_SERVICE_TYPE").is_none());
        assert!(handler_for("amount").is_none());
    }
}
