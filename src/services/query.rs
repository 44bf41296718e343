// src/services/query.rs

// Visões derivadas (filtros, ordenação, hierarquia). Funções puras sobre snapshots;
// nenhuma delas escreve em store.

use std::collections::{HashMap, HashSet, VecDeque};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::RecordId;
use crate::models::{
    commission::{Commission, CommissionStatus},
    dashboard::TeamMemberView,
    property::{Property, PropertyCategory, PropertyStatus},
    user::{User, UserRole},
};

// =========================================================================
//  COMISSÕES
// =========================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionFilter {
    pub date: Option<NaiveDate>, // Dia exato (UTC) da criação do registro
    pub status: Option<CommissionStatus>,
}

pub fn filter_commissions(commissions: &[Commission], filter: &CommissionFilter) -> Vec<Commission> {
    commissions
        .iter()
        .filter(|c| filter.date.is_none_or(|day| c.date.date_naive() == day))
        .filter(|c| filter.status.is_none_or(|status| c.status == status))
        .cloned()
        .collect()
}

// =========================================================================
//  IMÓVEIS
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertySort {
    PriceLow,
    PriceHigh,
    #[default]
    Newest,
    Oldest,
}

impl FromStr for PropertySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low" => Ok(PropertySort::PriceLow),
            "price-high" => Ok(PropertySort::PriceHigh),
            "newest" => Ok(PropertySort::Newest),
            "oldest" => Ok(PropertySort::Oldest),
            other => Err(format!("unknown sort mode '{other}'")),
        }
    }
}

/// Ordenação estável: empates mantêm a ordem original.
pub fn sort_properties(properties: &mut [Property], sort: PropertySort) {
    match sort {
        PropertySort::PriceLow => properties.sort_by(|a, b| a.price.cmp(&b.price)),
        PropertySort::PriceHigh => properties.sort_by(|a, b| b.price.cmp(&a.price)),
        PropertySort::Newest => properties.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        PropertySort::Oldest => properties.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    pub search: Option<String>, // Título OU localização
    pub category: Option<PropertyCategory>,
    pub status: Option<PropertyStatus>,
    pub location: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        let search_ok = match non_empty(&self.search) {
            Some(term) => contains_ci(&property.title, term) || contains_ci(&property.location, term),
            None => true,
        };
        let location_ok = match non_empty(&self.location) {
            Some(term) => contains_ci(&property.location, term),
            None => true,
        };

        search_ok
            && location_ok
            && self.category.is_none_or(|c| property.category == c)
            && self.status.is_none_or(|s| property.status == s)
            && self.min_price.is_none_or(|min| property.price >= min)
            && self.max_price.is_none_or(|max| property.price <= max)
    }
}

pub fn filter_properties(properties: &[Property], filter: &PropertyFilter) -> Vec<Property> {
    properties.iter().filter(|p| filter.matches(p)).cloned().collect()
}

// =========================================================================
//  EQUIPE
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TeamNode {
    pub user: User,
    pub sub_members: Vec<User>,
}

/// Equipe sem admins; cada `member` leva os `sub-member` alcançáveis
/// subindo as referências de `uplineId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamHierarchy {
    pub nodes: Vec<TeamNode>,
}

impl TeamHierarchy {
    pub fn build(users: &[User]) -> Self {
        let mut recruits: HashMap<RecordId, Vec<&User>> = HashMap::new();
        for user in users {
            if let Some(upline) = user.upline_id {
                recruits.entry(upline).or_default().push(user);
            }
        }

        let nodes = users
            .iter()
            .filter(|u| u.role != UserRole::Admin)
            .map(|u| TeamNode {
                user: u.clone(),
                sub_members: match u.role {
                    UserRole::Member => downline(u.id, &recruits)
                        .into_iter()
                        .filter(|d| d.role == UserRole::SubMember)
                        .collect(),
                    _ => Vec::new(),
                },
            })
            .collect();

        Self { nodes }
    }

    pub fn node(&self, id: RecordId) -> Option<&TeamNode> {
        self.nodes.iter().find(|n| n.user.id == id)
    }
}

// Busca em largura a partir de `root`; o conjunto de visitados protege contra ciclos nos dados
fn downline(root: RecordId, recruits: &HashMap<RecordId, Vec<&User>>) -> Vec<User> {
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut found = Vec::new();

    while let Some(current) = queue.pop_front() {
        for recruit in recruits.get(&current).into_iter().flatten() {
            // Um member aninhado responde pela própria equipe: a busca para nele
            if recruit.role == UserRole::Member || !visited.insert(recruit.id) {
                continue;
            }
            queue.push_back(recruit.id);
            found.push((*recruit).clone());
        }
    }

    found.sort_by_key(|u| u.id);
    found
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFilter {
    pub search: Option<String>, // Nome OU e-mail
    pub role: Option<UserRole>,
}

pub fn filter_team(team: &[TeamMemberView], filter: &TeamFilter) -> Vec<TeamMemberView> {
    team.iter()
        .filter(|m| match non_empty(&filter.search) {
            Some(term) => contains_ci(&m.user.name, term) || contains_ci(&m.user.email, term),
            None => true,
        })
        .filter(|m| filter.role.is_none_or(|role| m.user.role == role))
        .cloned()
        .collect()
}

// --- helpers ---

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn property(id: RecordId, title: &str, location: &str, price: u64, created_at: DateTime<Utc>) -> Property {
        Property {
            id,
            title: title.into(),
            location: location.into(),
            category: PropertyCategory::Apartment,
            size: "900 sq ft".into(),
            price,
            status: PropertyStatus::Available,
            images: vec![],
            created_at,
            listed_by: None,
            description: None,
        }
    }

    fn three_properties() -> Vec<Property> {
        vec![
            property(1, "Skyline 2BHK", "Andheri, Mumbai", 300, at(1, 9)),
            property(2, "Garden Villa", "Whitefield, Bengaluru", 100, at(3, 9)),
            property(3, "Harbour Loft", "Colaba, Mumbai", 200, at(2, 9)),
        ]
    }

    fn prices(properties: &[Property]) -> Vec<u64> {
        properties.iter().map(|p| p.price).collect()
    }

    fn ids(properties: &[Property]) -> Vec<RecordId> {
        properties.iter().map(|p| p.id).collect()
    }

    #[test]
    fn price_low_sorts_ascending() {
        let mut list = three_properties();
        sort_properties(&mut list, PropertySort::PriceLow);
        assert_eq!(prices(&list), vec![100, 200, 300]);

        sort_properties(&mut list, PropertySort::PriceHigh);
        assert_eq!(prices(&list), vec![300, 200, 100]);
    }

    #[test]
    fn newest_sorts_by_creation_with_stable_ties() {
        let mut list = three_properties();
        list.push(property(4, "Twin of 2", "Pune", 150, at(3, 9)));

        sort_properties(&mut list, PropertySort::Newest);
        assert_eq!(ids(&list), vec![2, 4, 3, 1]);

        sort_properties(&mut list, PropertySort::Oldest);
        assert_eq!(ids(&list), vec![1, 3, 2, 4]);
    }

    #[test]
    fn sort_modes_parse_from_their_ui_names() {
        assert_eq!("price-low".parse::<PropertySort>(), Ok(PropertySort::PriceLow));
        assert_eq!("oldest".parse::<PropertySort>(), Ok(PropertySort::Oldest));
        assert!("cheapest".parse::<PropertySort>().is_err());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let list = three_properties();
        let filter = PropertyFilter { min_price: Some(200), max_price: Some(300), ..Default::default() };
        assert_eq!(ids(&filter_properties(&list, &filter)), vec![1, 3]);
    }

    #[test]
    fn search_matches_title_or_location_case_insensitively() {
        let list = three_properties();

        let by_location = PropertyFilter { search: Some("mumbai".into()), ..Default::default() };
        assert_eq!(ids(&filter_properties(&list, &by_location)), vec![1, 3]);

        let by_title = PropertyFilter { search: Some("VILLA".into()), ..Default::default() };
        assert_eq!(ids(&filter_properties(&list, &by_title)), vec![2]);
    }

    #[test]
    fn filters_combine_with_and() {
        let mut list = three_properties();
        list[2].status = PropertyStatus::Sold;
        list[0].category = PropertyCategory::Commercial;

        let filter = PropertyFilter {
            location: Some("Mumbai".into()),
            status: Some(PropertyStatus::Available),
            ..Default::default()
        };
        assert_eq!(ids(&filter_properties(&list, &filter)), vec![1]);

        let filter = PropertyFilter {
            location: Some("Mumbai".into()),
            category: Some(PropertyCategory::Apartment),
            ..Default::default()
        };
        assert_eq!(ids(&filter_properties(&list, &filter)), vec![3]);
    }

    #[test]
    fn blank_search_terms_are_ignored() {
        let filter = PropertyFilter { search: Some("   ".into()), ..Default::default() };
        assert_eq!(filter_properties(&three_properties(), &filter).len(), 3);
    }

    fn commission(id: RecordId, status: CommissionStatus, date: DateTime<Utc>) -> Commission {
        Commission {
            id,
            property_id: id,
            member_id: None,
            sale_amount: Decimal::new(1_000_000, 0),
            commission_rate: Decimal::new(5, 2),
            total_commission: Decimal::new(50_000, 0),
            distributions: vec![],
            status,
            buyer_name: "Asha".into(),
            sale_date: date.date_naive(),
            date,
            property_sync: Default::default(),
        }
    }

    #[test]
    fn commission_filters_match_exact_day_and_status() {
        let list = vec![
            commission(1, CommissionStatus::Pending, at(5, 8)),
            commission(2, CommissionStatus::Paid, at(5, 23)),
            commission(3, CommissionStatus::Pending, at(6, 0)),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 1, 5);

        let by_day = CommissionFilter { date: day, status: None };
        assert_eq!(filter_commissions(&list, &by_day).len(), 2);

        let both = CommissionFilter { date: day, status: Some(CommissionStatus::Pending) };
        let found = filter_commissions(&list, &both);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);

        assert_eq!(filter_commissions(&list, &CommissionFilter::default()).len(), 3);
    }

    #[test]
    fn unmatched_status_yields_an_empty_list() {
        let list = vec![commission(1, CommissionStatus::Pending, at(5, 8))];
        let filter = CommissionFilter { date: None, status: Some(CommissionStatus::Cancelled) };
        assert!(filter_commissions(&list, &filter).is_empty());
    }

    fn user(id: RecordId, role: UserRole, upline: Option<RecordId>) -> User {
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            phone: String::new(),
            role,
            joined_date: at(1, 0),
            is_active: true,
            upline_id: upline,
        }
    }

    #[test]
    fn hierarchy_walks_upline_references() {
        let users = vec![
            user(1, UserRole::Admin, None),
            user(2, UserRole::Member, Some(1)),
            user(3, UserRole::Member, Some(1)),
            user(4, UserRole::SubMember, Some(2)),
            user(5, UserRole::SubMember, Some(3)),
            user(6, UserRole::SubMember, Some(4)),
        ];

        let hierarchy = TeamHierarchy::build(&users);

        assert!(hierarchy.node(1).is_none());
        let sub_ids = |id| -> Vec<RecordId> { hierarchy.node(id).unwrap().sub_members.iter().map(|u| u.id).collect() };
        assert_eq!(sub_ids(2), vec![4, 6]);
        assert_eq!(sub_ids(3), vec![5]);
        assert!(sub_ids(4).is_empty());
    }

    #[test]
    fn nested_members_keep_their_own_sub_members() {
        let users = vec![
            user(2, UserRole::Member, None),
            user(3, UserRole::SubMember, Some(2)),
            user(7, UserRole::Member, Some(2)),
            user(8, UserRole::SubMember, Some(7)),
        ];

        let hierarchy = TeamHierarchy::build(&users);
        let sub_ids = |id| -> Vec<RecordId> { hierarchy.node(id).unwrap().sub_members.iter().map(|u| u.id).collect() };
        assert_eq!(sub_ids(2), vec![3]);
        assert_eq!(sub_ids(7), vec![8]);
    }

    #[test]
    fn hierarchy_survives_cycles() {
        let users = vec![
            user(1, UserRole::Member, Some(2)),
            user(2, UserRole::SubMember, Some(1)),
        ];

        let hierarchy = TeamHierarchy::build(&users);
        let subs: Vec<RecordId> = hierarchy.node(1).unwrap().sub_members.iter().map(|u| u.id).collect();
        assert_eq!(subs, vec![2]);
    }

    #[test]
    fn team_filter_searches_name_or_email_and_role() {
        let view = |u: User| TeamMemberView { user: u, sub_members: vec![], total_sales: 0, total_earnings: Decimal::ZERO };
        let mut priya = user(2, UserRole::Member, None);
        priya.name = "Priya Sharma".into();
        let mut ravi = user(3, UserRole::SubMember, None);
        ravi.email = "ravi.sharma@example.com".into();
        let team = vec![view(priya), view(ravi)];

        let by_search = TeamFilter { search: Some("SHARMA".into()), role: None };
        assert_eq!(filter_team(&team, &by_search).len(), 2);

        let by_role = TeamFilter { search: Some("sharma".into()), role: Some(UserRole::SubMember) };
        let found = filter_team(&team, &by_role);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user.id, 3);
    }
}
