//! `get_rand_data()`: a fixed-shape faker payload.
//!
//! The field list and enumerated-value constraints are a contract (§6 of the
//! spec), not a suggestion — downstream schemas may reference any of these
//! field names directly, so the shape must not drift.

use chrono::Utc;
use fake::faker::address::en::{Latitude, Longitude};
use fake::faker::chrono::en::Date as FakeDate;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{DomainSuffix, FreeEmail, IPv4, IPv6, Password};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use rand::Rng;
use serde_json::{json, Value};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const TIME_ZONES: [&str; 6] = [
    "UTC",
    "America/New_York",
    "Europe/London",
    "Europe/Moscow",
    "Asia/Tokyo",
    "Australia/Sydney",
];
const TIME_PERIODS: [&str; 2] = ["AM", "PM"];
const PAYMENT_METHODS: [&str; 4] = ["cc", "paypal", "check", "money order"];

pub fn rand_data<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let first_name: String = FirstName().fake_with_rng(rng);
    let last_name: String = LastName().fake_with_rng(rng);
    let name: String = Name().fake_with_rng(rng);
    let domain: String = DomainSuffix().fake_with_rng(rng);
    let email: String = FreeEmail().fake_with_rng(rng);

    let year = rng.gen_range(1970..=2035);
    let month = rng.gen_range(1..=12u32);
    let day = rng.gen_range(1..=28u32);
    let hour = rng.gen_range(0..24u32);
    let minute = rng.gen_range(0..60u32);
    let second = rng.gen_range(0..60u32);

    let id_choice = *[1i64, 10000].get(rng.gen_range(0..2)).unwrap();
    let number_choice = *[1i64, 10000].get(rng.gen_range(0..2)).unwrap();
    let price_choice = *[1.5f64, 100.99].get(rng.gen_range(0..2)).unwrap();
    let payment_method = PAYMENT_METHODS[rng.gen_range(0..PAYMENT_METHODS.len())];

    json!({
        "lat": {
            let v: String = Latitude().fake_with_rng(rng);
            v.parse::<f64>().unwrap_or(0.0)
        },
        "long": {
            let v: String = Longitude().fake_with_rng(rng);
            v.parse::<f64>().unwrap_or(0.0)
        },
        "cc_number": rand_credit_card_number(rng),
        "cc_type": ["visa", "mastercard", "amex", "discover"][rng.gen_range(0..4)],
        "email": email,
        "domain_name": domain,
        "ipv4": { let v: String = IPv4().fake_with_rng(rng); v },
        "ipv6": { let v: String = IPv6().fake_with_rng(rng); v },
        "password": { let v: String = Password(8..16).fake_with_rng(rng); v },
        "jwt": rand_jwt(rng),
        "phone_number": rand_phone_number(rng),
        "mac_address": rand_mac_address(rng),
        "url": format!("https://{}.example/{}", rand_word(rng), rand_word(rng)),
        "username": format!("{}.{}{}", first_name.to_lowercase(), last_name.to_lowercase(), rng.gen_range(1..999)),
        "toll_free_number": format!("1-800-{:03}-{:04}", rng.gen_range(0..1000), rng.gen_range(0..10000)),
        "e_164_phone_number": format!("+1{:010}", rng.gen_range(0u64..10_000_000_000)),
        "first_name": first_name,
        "last_name": last_name,
        "name": name,
        "unix_time": Utc::now().timestamp() - rng.gen_range(0..31_536_000),
        "date": { let v: String = FakeDate().fake_with_rng(rng); v },
        "time": format!("{:02}:{:02}:{:02}", hour, minute, second),
        "month_name": MONTH_NAMES[(month as usize - 1).min(11)],
        "year": year.to_string(),
        "day_of_week": DAY_NAMES[rng.gen_range(0..7)],
        "timestamp": format!("{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z", year, month, day, hour, minute, second),
        "century": ((year / 100) + 1).to_string(),
        "timezone": TIME_ZONES[rng.gen_range(0..TIME_ZONES.len())],
        "time_period": TIME_PERIODS[rng.gen_range(0..2)],
        "word": rand_word(rng),
        "sentence": { let v: String = Sentence(4..12).fake_with_rng(rng); v },
        "paragraph": { let v: String = Paragraph(2..5).fake_with_rng(rng); v },
        "currency": { let v: String = CurrencyCode().fake_with_rng(rng); v },
        "amount": (rng.gen_range(1..100_000) as f64) / 100.0,
        "amount_with_currency": format!("{:.2} USD", (rng.gen_range(1..100_000) as f64) / 100.0),
        "uuid_hyphenated": uuid::Uuid::new_v4().to_string(),
        "uuid_digit": uuid::Uuid::new_v4().simple().to_string(),
        "payment_method": payment_method,
        "id": id_choice,
        "price": price_choice,
        "number": number_choice,
    })
}

fn rand_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    Word().fake_with_rng(rng)
}

fn rand_credit_card_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..4)
        .map(|_| format!("{:04}", rng.gen_range(0..10000)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rand_jwt<R: Rng + ?Sized>(rng: &mut R) -> String {
    let segment = |rng: &mut R, len: usize| -> String {
        const ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    };
    format!(
        "{}.{}.{}",
        segment(rng, 20),
        segment(rng, 40),
        segment(rng, 20)
    )
}

fn rand_phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "+1-{:03}-{:03}-{:04}",
        rng.gen_range(200..999),
        rng.gen_range(200..999),
        rng.gen_range(0..10000)
    )
}

fn rand_mac_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..6)
        .map(|_| format!("{:02x}", rng.gen_range(0..256)))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKER_FIELDS: [&str; 40] = [
        "lat",
        "long",
        "cc_number",
        "cc_type",
        "email",
        "domain_name",
        "ipv4",
        "ipv6",
        "password",
        "jwt",
        "phone_number",
        "mac_address",
        "url",
        "username",
        "toll_free_number",
        "e_164_phone_number",
        "first_name",
        "last_name",
        "name",
        "unix_time",
        "date",
        "time",
        "month_name",
        "year",
        "day_of_week",
        "timestamp",
        "century",
        "timezone",
        "time_period",
        "word",
        "sentence",
        "paragraph",
        "currency",
        "amount",
        "amount_with_currency",
        "uuid_hyphenated",
        "uuid_digit",
        "payment_method",
        "id",
        "price",
    ];

    #[test]
    fn produces_every_contract_field() {
        let mut rng = rand::thread_rng();
        let v = rand_data(&mut rng);
        let obj = v.as_object().unwrap();
        for field in FAKER_FIELDS {
            assert!(obj.contains_key(field), "missing field {field}");
        }
        assert!(obj.contains_key("number"));
    }

    #[test]
    fn payment_method_is_one_of_the_enumerated_values() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let v = rand_data(&mut rng);
            let pm = v["payment_method"].as_str().unwrap();
            assert!(["cc", "paypal", "check", "money order"].contains(&pm));
        }
    }

    #[test]
    fn id_and_number_are_one_of_the_enumerated_values() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let v = rand_data(&mut rng);
            assert!([1, 10000].contains(&v["id"].as_i64().unwrap()));
            assert!([1, 10000].contains(&v["number"].as_i64().unwrap()));
        }
    }
}
