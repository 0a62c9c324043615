//! Client-side search, status filter and sort over the full report list.

use std::cmp::Ordering;

use lastseen_core::report::{Report, Status};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};

/// The field the listing is ordered by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
  #[default]
  DateReported,
  Name,
  LastSeenDate,
}

impl SortField {
  /// The next field in display order, wrapping around.
  pub fn next(self) -> Self {
    let all: Vec<Self> = Self::iter().collect();
    let pos = all.iter().position(|f| *f == self).unwrap_or(0);
    all[(pos + 1) % all.len()]
  }

  pub fn label(self) -> &'static str {
    match self {
      SortField::DateReported => "Date Reported",
      SortField::Name => "Name",
      SortField::LastSeenDate => "Last Seen",
    }
  }

  fn compare(self, a: &Report, b: &Report) -> Ordering {
    match self {
      SortField::DateReported => a.date_reported.cmp(&b.date_reported),
      SortField::Name => a.name.cmp(&b.name),
      SortField::LastSeenDate => a.last_seen_date.cmp(&b.last_seen_date),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  pub fn toggle(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }
}

/// Everything that shapes the visible list. The default shows every report,
/// newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
  /// Case-insensitive substring over name, last-seen location and
  /// description. Blank means no search.
  pub search:    String,
  /// `None` shows all statuses.
  pub status:    Option<Status>,
  pub sort:      SortField,
  pub direction: SortDirection,
}

impl ListingQuery {
  /// Cycle the status filter: all, missing, critical, found, all.
  pub fn cycle_status(&mut self) {
    let mut statuses = Status::iter();
    self.status = match self.status {
      None => statuses.next(),
      Some(current) => statuses.skip_while(|s| *s != current).nth(1),
    };
  }

  pub fn matches(&self, report: &Report) -> bool {
    if self.status.is_some_and(|s| s != report.status) {
      return false;
    }
    let term = self.search.trim().to_lowercase();
    term.is_empty()
      || [
        &report.name,
        &report.last_seen_location,
        &report.description,
      ]
      .iter()
      .any(|field| field.to_lowercase().contains(&term))
  }

  /// Filter and sort `reports`. The sort is stable, so ties keep their
  /// original order in either direction.
  pub fn apply<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
    let mut out: Vec<&Report> =
      reports.iter().filter(|r| self.matches(r)).collect();
    out.sort_by(|a, b| {
      let ord = self.sort.compare(a, b);
      match self.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
      }
    });
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::{Duration, NaiveDate, Utc};
  use uuid::Uuid;

  fn report(name: &str, location: &str, status: Status, age_days: i64) -> Report {
    Report {
      id:                   Uuid::new_v4(),
      name:                 name.into(),
      age:                  None,
      gender:               None,
      height:               None,
      weight:               None,
      last_seen_date:       NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        + Duration::days(age_days),
      last_seen_location:   location.into(),
      description:          "Left home in the early morning on foot.".into(),
      identifying_features: None,
      medical_conditions:   None,
      contact_person:       "Kim".into(),
      contact_phone:        "5551234567".into(),
      photos:               vec![],
      status,
      date_reported:        Utc::now() - Duration::days(age_days),
    }
  }

  fn sample() -> Vec<Report> {
    vec![
      report("Carol", "Harbour", Status::Missing, 3),
      report("alice", "Old Town", Status::Found, 1),
      report("Bob", "harbour front", Status::Critical, 2),
    ]
  }

  fn names<'a>(list: &[&'a Report]) -> Vec<&'a str> {
    list.iter().map(|r| r.name.as_str()).collect()
  }

  #[test]
  fn default_is_newest_first() {
    let reports = sample();
    let out = ListingQuery::default().apply(&reports);
    assert_eq!(names(&out), ["alice", "Bob", "Carol"]);
  }

  #[test]
  fn search_is_case_insensitive_over_location() {
    let reports = sample();
    let query = ListingQuery {
      search: "HARBOUR".into(),
      ..Default::default()
    };
    assert_eq!(names(&query.apply(&reports)), ["Bob", "Carol"]);
  }

  #[test]
  fn search_covers_description_and_name() {
    let reports = sample();
    let by_description = ListingQuery {
      search: "early morning".into(),
      ..Default::default()
    };
    assert_eq!(by_description.apply(&reports).len(), 3);

    let by_name = ListingQuery {
      search: "ALI".into(),
      ..Default::default()
    };
    assert_eq!(names(&by_name.apply(&reports)), ["alice"]);
  }

  #[test]
  fn status_filter_and_name_sort() {
    let reports = sample();
    let mut query = ListingQuery {
      sort: SortField::Name,
      direction: SortDirection::Asc,
      ..Default::default()
    };
    // Byte order: uppercase sorts before lowercase.
    assert_eq!(names(&query.apply(&reports)), ["Bob", "Carol", "alice"]);

    query.status = Some(Status::Critical);
    assert_eq!(names(&query.apply(&reports)), ["Bob"]);
  }

  #[test]
  fn last_seen_sort_both_directions() {
    let reports = sample();
    let mut query = ListingQuery {
      sort: SortField::LastSeenDate,
      direction: SortDirection::Asc,
      ..Default::default()
    };
    assert_eq!(names(&query.apply(&reports)), ["alice", "Bob", "Carol"]);
    query.direction = query.direction.toggle();
    assert_eq!(names(&query.apply(&reports)), ["Carol", "Bob", "alice"]);
  }

  #[test]
  fn cycles_wrap_around() {
    let mut query = ListingQuery::default();
    let seen: Vec<Option<Status>> = (0..4)
      .map(|_| {
        query.cycle_status();
        query.status
      })
      .collect();
    assert_eq!(
      seen,
      [
        Some(Status::Missing),
        Some(Status::Critical),
        Some(Status::Found),
        None
      ]
    );

    assert_eq!(SortField::DateReported.next(), SortField::Name);
    assert_eq!(SortField::LastSeenDate.next(), SortField::DateReported);
    assert_eq!("lastSeenDate".parse::<SortField>().unwrap(), SortField::LastSeenDate);
  }
}
